//! # Dependency Wiring / 依赖注入
//!
//! Builds every adapter from [`AppConfig`] and hands them to [`App::new`].
//! The only place that knows which concrete type backs each port.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;
use cm_app::{App, AppDeps};
use cm_core::config::AppConfig;
use cm_core::ports::{KeyValueStorePort, TelemetryPort};
use cm_core::Endpoint;
use cm_infra::{
    HttpSnippetSource, HttpTelemetry, InMemoryKeyValueStore, JsonFileKeyValueStore, NoopTelemetry,
};
use cm_platform::adapters::{ChannelTextInsertion, ChannelUiPort, InMemoryMenuSurface};
use cm_platform::runtime::{host_event_channel, HostEventReceiver};

use super::paths;

/// `--store :memory:` keeps everything in process memory.
pub const IN_MEMORY_STORE: &str = ":memory:";

pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
/// 依赖注入错误（基础设施初始化失败）
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Store initialization failed: {0}")]
    StoreInit(String),

    #[error("HTTP client initialization failed: {0}")]
    HttpInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// The assembled application plus the host-facing ends the bridge needs.
pub struct WiredApp {
    pub app: Arc<App>,
    pub menu_surface: Arc<InMemoryMenuSurface>,
    pub host_events: HostEventReceiver,
}

fn resolve_store_path(config: &AppConfig) -> WiringResult<PathBuf> {
    if !config.store_path.as_os_str().is_empty() {
        return Ok(config.store_path.clone());
    }
    paths::default_store_path().map_err(|e| WiringError::StoreInit(e.to_string()))
}

async fn create_store(path: &Path) -> WiringResult<Arc<dyn KeyValueStorePort>> {
    if path.as_os_str() == IN_MEMORY_STORE {
        info!("Using in-memory store");
        return Ok(Arc::new(InMemoryKeyValueStore::new()));
    }
    let store = JsonFileKeyValueStore::open(path)
        .await
        .map_err(|e| WiringError::StoreInit(format!("{e:#}")))?;
    Ok(Arc::new(store))
}

fn create_telemetry(config: &AppConfig) -> WiringResult<Arc<dyn TelemetryPort>> {
    if !config.telemetry_enabled {
        info!("Telemetry disabled by config");
        return Ok(Arc::new(NoopTelemetry));
    }
    let telemetry = HttpTelemetry::new(config.http_timeout())
        .map_err(|e| WiringError::HttpInit(format!("{e:#}")))?;
    Ok(Arc::new(telemetry))
}

/// Wire all dependencies
/// 连接所有依赖
pub async fn wire_dependencies(config: &AppConfig) -> WiringResult<WiredApp> {
    if config.default_endpoint.trim().is_empty() {
        return Err(WiringError::Config("default_endpoint is empty".to_string()));
    }

    let store_path = resolve_store_path(config)?;
    let store = create_store(&store_path).await?;

    let snippet_source = HttpSnippetSource::new(config.http_timeout())
        .map_err(|e| WiringError::HttpInit(format!("{e:#}")))?;
    let telemetry = create_telemetry(config)?;

    let (event_tx, host_events) = host_event_channel();
    let menu_surface = Arc::new(InMemoryMenuSurface::new(event_tx.clone()));

    let app = App::new(AppDeps {
        store,
        snippet_source: Arc::new(snippet_source),
        telemetry,
        menu_surface: menu_surface.clone(),
        text_insertion: Arc::new(ChannelTextInsertion::new(event_tx.clone())),
        ui_port: Arc::new(ChannelUiPort::new(event_tx)),
        default_endpoint: Endpoint::new(&config.default_endpoint),
        refresh_interval: config.refresh_interval(),
        storage_change_debounce: config.storage_change_debounce(),
    });

    info!(
        store = %store_path.display(),
        endpoint = %config.default_endpoint,
        refresh_secs = config.refresh_interval_secs,
        "Dependencies wired"
    );

    Ok(WiredApp {
        app: Arc::new(app),
        menu_surface,
        host_events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wires_with_in_memory_store() {
        let config = AppConfig {
            store_path: PathBuf::from(IN_MEMORY_STORE),
            telemetry_enabled: false,
            ..AppConfig::default()
        };

        let wired = wire_dependencies(&config).await.unwrap();

        assert_eq!(
            wired.app.state.endpoint().await.unwrap().as_str(),
            cm_core::config::PRODUCTION_ENDPOINT
        );
    }

    #[tokio::test]
    async fn test_empty_endpoint_is_rejected() {
        let config = AppConfig {
            default_endpoint: "  ".to_string(),
            store_path: PathBuf::from(IN_MEMORY_STORE),
            ..AppConfig::default()
        };

        assert!(matches!(
            wire_dependencies(&config).await,
            Err(WiringError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_corrupt_store_file_fails_wiring() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{").unwrap();
        let config = AppConfig {
            store_path: path,
            ..AppConfig::default()
        };

        assert!(matches!(
            wire_dependencies(&config).await,
            Err(WiringError::StoreInit(_))
        ));
    }
}
