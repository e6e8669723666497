//! chaptree - 文档项目章节列表工具
//!
//! 将项目配置中嵌套的 `chapters` 列表展开为有序的章节文件序列，
//! 并提供标题查找、成员判断、索引访问与路径反查。
//!
//! 领域层 (domain/):
//! - Chapters Context: 章节节点模型、展开与查找、Chapters 聚合
//! - Options Context: 预处理器选项的校验、转换与多来源合并
//! - preprocessor_ext: 标签上下文截取与处理失败兜底
//!
//! 配置层 (config/):
//! - 项目配置加载（默认值 < 配置文件 < 环境变量）与日志初始化
//!
//! 基础设施层 (infrastructure/):
//! - fs: Markdown 章节文件前插内容
//!
//! ```
//! use chaptree::{ChapterNode, Chapters};
//!
//! let chapters = Chapters::new(vec![
//!     ChapterNode::leaf("index.md"),
//!     ChapterNode::titled("Requirements", "req.md"),
//!     ChapterNode::group("Guide", vec![ChapterNode::leaf("guide/setup.md")]),
//! ]);
//!
//! assert_eq!(chapters.flat(), ["index.md", "req.md", "guide/setup.md"]);
//! assert_eq!(chapters.title_of("req.md"), "Requirements");
//! assert!(chapters.contains("guide/setup.md"));
//! ```

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_project_config, ProjectConfig};
pub use domain::chapters::{ChapterChild, ChapterError, ChapterNode, Chapters};
pub use domain::options::{CombinedOptions, Options, OptionsError};
pub use domain::preprocessor_ext::{allow_fail, allow_fail_tag, get_tag_context, TagMatch};
