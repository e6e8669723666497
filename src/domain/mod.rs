//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Chapters Context: 章节列表展开与查找
//! - Options Context: 预处理器选项
//! - 预处理器扩展: 标签上下文与失败兜底

pub mod chapters;
pub mod options;
pub mod preprocessor_ext;
