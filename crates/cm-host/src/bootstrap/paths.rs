//! Platform directories
//! 平台目录

use std::path::PathBuf;

use anyhow::{Context, Result};

const APP_DIR_NAME: &str = "clickmemory";

/// `<data dir>/clickmemory/store.json`
pub fn default_store_path() -> Result<PathBuf> {
    Ok(dirs::data_dir()
        .context("no platform data directory")?
        .join(APP_DIR_NAME)
        .join("store.json"))
}

/// `<config dir>/clickmemory/config.toml`
pub fn default_config_path() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("no platform config directory")?
        .join(APP_DIR_NAME)
        .join("config.toml"))
}

/// `<local data dir>/clickmemory/logs`
pub fn logs_dir() -> Result<PathBuf> {
    Ok(dirs::data_local_dir()
        .context("no platform local data directory")?
        .join(APP_DIR_NAME)
        .join("logs"))
}
