//! Chapters Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChapterError {
    #[error("章节不在章节列表中: {0}")]
    NotFound(String),

    #[error("章节索引越界: index={index}, len={len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("无效的章节结构: {0}")]
    Validation(String),

    #[error("路径解析失败: {0}")]
    Io(String),
}
