//! # Configuration Loader / 配置加载器
//!
//! Reads the TOML file and maps it to the [`AppConfig`] DTO. Defaults for
//! missing keys live in `AppConfig::from_toml`, not here.

use std::path::Path;

use anyhow::Context;
use tracing::info;
use cm_core::config::AppConfig;

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// - File cannot be read (I/O error)
/// - Content is not valid TOML (parse error)
/// - A value has the wrong type or is negative (mapping error)
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Like [`load_config`], but a missing file yields `AppConfig::default()`.
pub fn load_config_or_default(config_path: &Path) -> anyhow::Result<AppConfig> {
    if !config_path.exists() {
        info!(path = %config_path.display(), "Config file not found, using defaults");
        return Ok(AppConfig::default());
    }
    load_config(config_path)
}
