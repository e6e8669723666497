//! 日志初始化

use tracing_subscriber::EnvFilter;

use super::{ConfigError, LogConfig};

/// 安装全局 tracing 订阅者
///
/// `RUST_LOG` 优先于配置中的日志级别。已安装过订阅者时直接返回。
pub fn init_tracing(config: &LogConfig) -> Result<(), ConfigError> {
    let log_filter = format!("{},chaptree={}", config.level, config.level);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log_filter))
        .map_err(|e| ConfigError::LoggingError(e.to_string()))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        tracing::debug!("Tracing subscriber already installed: {}", e);
    }

    Ok(())
}
