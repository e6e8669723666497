//! Configuration Loader
//!
//! 实现项目配置的多源加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 项目配置文件（YAML 或 TOML）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::types::{default_src_dir, default_tmp_dir, LogConfig, ProjectConfig};
use crate::domain::chapters::{ChapterError, ChapterNode};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Failed to initialize logging: {0}")]
    LoggingError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 环境变量前缀
const ENV_PREFIX: &str = "CHAPTREE";

/// 项目配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFormat {
    Yaml,
    Toml,
}

impl ProjectFormat {
    /// 根据扩展名判断格式，无扩展名时按 YAML 处理
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            None | Some("yml") | Some("yaml") => Ok(Self::Yaml),
            Some("toml") => Ok(Self::Toml),
            Some(other) => Err(ConfigError::LoadError(format!(
                "Unsupported project file extension: {}",
                other
            ))),
        }
    }

    fn file_format(self) -> FileFormat {
        match self {
            Self::Yaml => FileFormat::Yaml,
            Self::Toml => FileFormat::Toml,
        }
    }
}

/// 除章节列表外的标量设置
#[derive(Debug, Deserialize)]
struct ProjectSettings {
    tmp_dir: PathBuf,
    src_dir: PathBuf,
    #[serde(default)]
    log: LogConfig,
}

#[derive(Debug, Deserialize)]
struct ChaptersSection {
    chapters: Vec<ChapterNode>,
}

/// 加载项目配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `CHAPTREE_`，层级分隔符 `__`）
/// 2. 项目配置文件
/// 3. 默认值
///
/// # 环境变量示例
/// - `CHAPTREE_SRC_DIR=docs`
/// - `CHAPTREE_TMP_DIR=/tmp/build`
/// - `CHAPTREE_LOG__LEVEL=debug`
///
/// 章节列表不参与环境变量覆盖，直接从文件原文解析，保证标题原样保留。
pub fn load_project_config(path: &Path) -> Result<ProjectConfig, ConfigError> {
    load_project_config_with_prefix(path, ENV_PREFIX)
}

fn load_project_config_with_prefix(
    path: &Path,
    env_prefix: &str,
) -> Result<ProjectConfig, ConfigError> {
    let format = ProjectFormat::from_path(path)?;

    // 1. 默认值（最低优先级）
    let mut builder = Config::builder()
        .set_default("tmp_dir", default_tmp_dir().to_string_lossy().into_owned())?
        .set_default("src_dir", default_src_dir().to_string_lossy().into_owned())?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 项目配置文件
    builder = builder.add_source(File::from(path).format(format.file_format()).required(true));

    // 3. 环境变量（最高优先级）
    builder = builder.add_source(
        Environment::with_prefix(env_prefix)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let settings: ProjectSettings = builder.build()?.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize settings: {}", e))
    })?;

    let raw = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::LoadError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let chapters = match format {
        ProjectFormat::Yaml => parse_chapters_yaml(&raw),
        ProjectFormat::Toml => parse_chapters_toml(&raw),
    }
    .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    let config = ProjectConfig {
        chapters,
        tmp_dir: settings.tmp_dir,
        src_dir: settings.src_dir,
        log: settings.log,
    };

    validate_config(&config)?;

    tracing::debug!(
        "Loaded project config from {}: {} top-level chapters",
        path.display(),
        config.chapters.len()
    );

    Ok(config)
}

/// 从 YAML 文本的 `chapters` 键解析章节列表
pub fn parse_chapters_yaml(source: &str) -> Result<Vec<ChapterNode>, ChapterError> {
    serde_yaml::from_str::<ChaptersSection>(source)
        .map(|section| section.chapters)
        .map_err(|e| ChapterError::Validation(e.to_string()))
}

/// 从 TOML 文本的 `chapters` 键解析章节列表
pub fn parse_chapters_toml(source: &str) -> Result<Vec<ChapterNode>, ChapterError> {
    toml::from_str::<ChaptersSection>(source)
        .map(|section| section.chapters)
        .map_err(|e| ChapterError::Validation(e.to_string()))
}

/// 验证配置有效性
pub fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.src_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Source directory cannot be empty".to_string(),
        ));
    }

    if config.tmp_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Temporary directory cannot be empty".to_string(),
        ));
    }

    if config.tmp_dir == config.src_dir {
        return Err(ConfigError::ValidationError(format!(
            "Temporary directory must differ from source directory: {}",
            config.src_dir.display()
        )));
    }

    if config.chapters.is_empty() {
        tracing::warn!("Chapter list is empty");
    }

    Ok(())
}

/// 打印配置信息
pub fn print_config(config: &ProjectConfig) {
    tracing::info!("=== Project Configuration ===");
    tracing::info!("Source Directory: {:?}", config.src_dir);
    tracing::info!("Temporary Directory: {:?}", config.tmp_dir);
    tracing::info!(
        "Chapters: {}",
        crate::domain::chapters::filenames(&config.chapters).count()
    );
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=============================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn project_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const YAML: &str = "\
title: Manual
src_dir: docs
chapters:
  - index.md
  - Requirements: req.md
  - Quick Start:
      - qs/install.md
";

    #[test]
    fn test_load_yaml_project() {
        let file = project_file(".yml", YAML);
        let config = load_project_config_with_prefix(file.path(), "CHAPTREE_TEST_YAML").unwrap();

        assert_eq!(config.src_dir, PathBuf::from("docs"));
        assert_eq!(config.tmp_dir, PathBuf::from("__tmp__"));
        assert_eq!(config.log.level, "info");
        assert_eq!(
            crate::domain::chapters::flatten(&config.chapters),
            ["index.md", "req.md", "qs/install.md"]
        );
        assert_eq!(
            crate::domain::chapters::title_of(&config.chapters, "req.md"),
            "Requirements"
        );
    }

    #[test]
    fn test_load_toml_project() {
        let file = project_file(
            ".toml",
            "tmp_dir = \"build\"\nchapters = [\"index.md\", { \"Quick Start\" = [\"qs.md\"] }]\n\n[log]\nlevel = \"debug\"\n",
        );
        let config = load_project_config_with_prefix(file.path(), "CHAPTREE_TEST_TOML").unwrap();

        assert_eq!(config.tmp_dir, PathBuf::from("build"));
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.chapters[1].title(), Some("Quick Start"));
    }

    #[test]
    fn test_env_overrides_file() {
        std::env::set_var("CHAPTREE_TEST_ENV_SRC_DIR", "from_env");
        let file = project_file(".yaml", YAML);
        let config = load_project_config_with_prefix(file.path(), "CHAPTREE_TEST_ENV").unwrap();
        std::env::remove_var("CHAPTREE_TEST_ENV_SRC_DIR");

        assert_eq!(config.src_dir, PathBuf::from("from_env"));
    }

    #[test]
    fn test_malformed_chapters_rejected() {
        let file = project_file(".yml", "chapters:\n  - A: a.md\n    B: b.md\n");
        let err = load_project_config_with_prefix(file.path(), "CHAPTREE_TEST_BAD").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_project_config(Path::new("/definitely/not/here.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(ProjectFormat::from_path(Path::new("project.ini")).is_err());
        assert_eq!(
            ProjectFormat::from_path(Path::new("project.yml")).unwrap(),
            ProjectFormat::Yaml
        );
    }

    #[test]
    fn test_parse_chapters_yaml() {
        let chapters = parse_chapters_yaml("chapters:\n  - a.md\n  - B: b.md\n").unwrap();
        assert_eq!(chapters.len(), 2);

        let err = parse_chapters_yaml("chapters:\n  - 12\n").unwrap_err();
        assert!(matches!(err, ChapterError::Validation(_)));
    }

    #[test]
    fn test_parse_chapters_toml() {
        let chapters = parse_chapters_toml("chapters = [\"a.md\"]").unwrap();
        assert_eq!(chapters, vec![ChapterNode::leaf("a.md")]);
        assert!(parse_chapters_toml("chapters = [1]").is_err());
    }

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = ProjectConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_empty_src_dir() {
        let mut config = ProjectConfig::default();
        config.src_dir = PathBuf::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_same_dirs() {
        let mut config = ProjectConfig::default();
        config.tmp_dir = config.src_dir.clone();
        assert!(validate_config(&config).is_err());
    }
}
