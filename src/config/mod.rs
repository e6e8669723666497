//! Configuration Module
//!
//! 提供项目配置管理功能，支持多层级配置来源：
//! - 环境变量（最高优先级）
//! - 项目配置文件（YAML 或 TOML 格式）
//! - 默认值（最低优先级）

mod loader;
mod logging;
mod types;

pub use loader::{
    load_project_config, parse_chapters_toml, parse_chapters_yaml, print_config,
    validate_config, ConfigError, ProjectFormat,
};
pub use logging::init_tracing;
pub use types::{LogConfig, ProjectConfig};
