//! Configuration Types
//!
//! 定义项目配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::chapters::ChapterNode;

/// 项目主配置
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// 嵌套章节列表
    pub chapters: Vec<ChapterNode>,

    /// 构建临时目录（预处理器的工作目录）
    #[serde(default = "default_tmp_dir")]
    pub tmp_dir: PathBuf,

    /// 章节源文件目录
    #[serde(default = "default_src_dir")]
    pub src_dir: PathBuf,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

pub(crate) fn default_tmp_dir() -> PathBuf {
    PathBuf::from("__tmp__")
}

pub(crate) fn default_src_dir() -> PathBuf {
    PathBuf::from("src")
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            chapters: Vec::new(),
            tmp_dir: default_tmp_dir(),
            src_dir: default_src_dir(),
            log: LogConfig::default(),
        }
    }
}

impl ProjectConfig {
    /// 源目录下的章节文件路径
    pub fn src_paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        crate::domain::chapters::resolve_paths(&self.chapters, &self.src_dir)
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
