//! Chapters Context - 章节限界上下文
//!
//! 职责:
//! - 嵌套章节列表的节点模型
//! - 展开、路径拼接、标题查找
//! - 章节列表聚合（缓存展开结果，按文件路径反查章节）

mod aggregate;
mod errors;
mod node;
mod tree;

pub use aggregate::Chapters;
pub use errors::ChapterError;
pub use node::{ChapterChild, ChapterNode};
pub use tree::{
    contains, filenames, find_chapter, flatten, index, resolve_paths, title_of, Filenames,
    Located,
};
