//! # Configuration DTO / 配置数据
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Define configuration data structures / 定义配置数据结构
//! - ✅ Provide TOML → DTO mapping / 提供 TOML → DTO 的映射
//!
//! Keys missing from the file take the values of [`AppConfig::default`].
//! Environment-specific endpoints (local dev vs. production) are chosen here,
//! never hard-coded in use cases.

use std::path::PathBuf;
use std::time::Duration;

/// Production web app.
pub const PRODUCTION_ENDPOINT: &str = "https://click-memory.vercel.app";

/// Local development web app.
pub const LOCALHOST_ENDPOINT: &str = "http://localhost:3000";

/// Application configuration DTO
/// 应用配置 DTO
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Endpoint used when the store carries no override
    /// 存储中没有覆盖值时使用的服务地址
    pub default_endpoint: String,

    /// Periodic sync interval in seconds
    pub refresh_interval_secs: u64,

    /// Delay before rebuilding after a credential/endpoint change
    pub storage_change_debounce_ms: u64,

    /// Key-value store file (empty means "use the platform data dir")
    pub store_path: PathBuf,

    /// Send best-effort usage events to `/api/track`
    pub telemetry_enabled: bool,

    /// Request timeout; `None` leaves reqwest's default
    pub http_timeout_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_endpoint: PRODUCTION_ENDPOINT.to_string(),
            refresh_interval_secs: 120,
            storage_change_debounce_ms: 500,
            store_path: PathBuf::new(),
            telemetry_enabled: true,
            http_timeout_secs: None,
        }
    }
}

impl AppConfig {
    /// Create AppConfig from TOML value
    /// 从 TOML 值创建 AppConfig
    ///
    /// ```toml
    /// [remote]
    /// default_endpoint = "http://localhost:3000"
    ///
    /// [sync]
    /// refresh_interval_secs = 120
    /// storage_change_debounce_ms = 500
    ///
    /// [storage]
    /// store_path = "/tmp/clickmemory/store.json"
    ///
    /// [telemetry]
    /// enabled = false
    ///
    /// [http]
    /// timeout_secs = 30
    /// ```
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let section = |name: &str, key: &str| toml_value.get(name).and_then(|s| s.get(key));

        let non_negative = |name: &str, key: &str| -> anyhow::Result<Option<u64>> {
            match section(name, key).and_then(|v| v.as_integer()) {
                None => Ok(None),
                Some(n) if n < 0 => Err(anyhow::anyhow!("[{name}] {key} must not be negative, got {n}")),
                Some(n) => Ok(Some(n as u64)),
            }
        };

        let refresh_interval_secs =
            non_negative("sync", "refresh_interval_secs")?.unwrap_or(defaults.refresh_interval_secs);
        if refresh_interval_secs == 0 {
            return Err(anyhow::anyhow!("[sync] refresh_interval_secs must be positive"));
        }

        Ok(Self {
            default_endpoint: section("remote", "default_endpoint")
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or(defaults.default_endpoint),
            refresh_interval_secs,
            storage_change_debounce_ms: non_negative("sync", "storage_change_debounce_ms")?
                .unwrap_or(defaults.storage_change_debounce_ms),
            store_path: section("storage", "store_path")
                .and_then(|v| v.as_str())
                .map(PathBuf::from)
                .unwrap_or(defaults.store_path),
            telemetry_enabled: section("telemetry", "enabled")
                .and_then(|v| v.as_bool())
                .unwrap_or(defaults.telemetry_enabled),
            http_timeout_secs: non_negative("http", "timeout_secs")?,
        })
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn storage_change_debounce(&self) -> Duration {
        Duration::from_millis(self.storage_change_debounce_ms)
    }

    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }
}
