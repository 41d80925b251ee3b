//! # Application Dependencies / 应用依赖
//!
//! Dependency grouping for [`App`](crate::App) construction. Not a builder:
//! no build steps, no default values, no hidden logic.
//! 仅用于参数打包。

use std::sync::Arc;
use std::time::Duration;

use cm_core::ports::*;
use cm_core::Endpoint;

/// Every port the use cases need, plus the timing knobs of the triggers.
/// All fields are required.
pub struct AppDeps {
    // Storage / 存储
    pub store: Arc<dyn KeyValueStorePort>,

    // Remote / 远程
    pub snippet_source: Arc<dyn SnippetSourcePort>,
    pub telemetry: Arc<dyn TelemetryPort>,

    // Host capabilities / 宿主能力
    pub menu_surface: Arc<dyn MenuSurfacePort>,
    pub text_insertion: Arc<dyn TextInsertionPort>,
    pub ui_port: Arc<dyn UiPort>,

    // Configuration / 配置
    pub default_endpoint: Endpoint,
    pub refresh_interval: Duration,
    pub storage_change_debounce: Duration,
}
