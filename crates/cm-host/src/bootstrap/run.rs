//! Startup and shutdown sequence
//! 启动与关闭流程

use tokio::io::BufReader;
use tracing::{info, info_span, Instrument};
use cm_core::config::AppConfig;
use cm_platform::ipc::ControlMessage;
use cm_platform::runtime::{control_channel, ExtensionRuntime, RuntimeHandle};

use super::wiring::{wire_dependencies, WiredApp};
use crate::bridge::run_bridge;

/// Wire, start the triggers, serve the bridge on stdin/stdout until EOF.
pub async fn run_app(config: AppConfig) -> anyhow::Result<()> {
    let WiredApp {
        app,
        menu_surface,
        host_events,
    } = wire_dependencies(&config).await?;

    let listener = app
        .start()
        .instrument(info_span!("app.start"))
        .await?;

    let (control_tx, control_rx) = control_channel();
    let runtime = tokio::spawn(ExtensionRuntime::new(app.clone(), control_rx).start());
    let handle = RuntimeHandle::new(control_tx);

    info!("ClickMemory companion ready");
    let bridge_result = run_bridge(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        handle.clone(),
        menu_surface,
        host_events,
    )
    .await;

    handle.request(ControlMessage::Shutdown).await;
    listener.abort();
    if let Err(e) = runtime.await {
        tracing::error!(error = %e, "Extension runtime task failed");
    }
    info!("ClickMemory companion stopped");

    bridge_result
}
