//! Infrastructure Layer - 基础设施层
//!
//! - fs: 章节文件读写辅助

pub mod fs;
