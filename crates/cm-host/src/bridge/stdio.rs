//! Bridge loop: read request lines, dispatch, write responses and events.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use cm_platform::adapters::InMemoryMenuSurface;
use cm_platform::ipc::{ControlMessage, HostEvent};
use cm_platform::runtime::{ControlError, ControlResponse, HostEventReceiver, RuntimeHandle};

use super::protocol::{parse_request, BridgeOutput, InboundMessage, ResponseLine};

const OUTPUT_CHANNEL_CAPACITY: usize = 64;

/// Run until `reader` hits EOF.
///
/// Requests are handled concurrently; responses go out in completion order.
/// On EOF the bridge waits for in-flight requests and flushes queued host
/// events before returning.
pub async fn run_bridge<R, W>(
    reader: R,
    writer: W,
    handle: RuntimeHandle,
    surface: Arc<InMemoryMenuSurface>,
    events: HostEventReceiver,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (out_tx, out_rx) = mpsc::channel::<BridgeOutput>(OUTPUT_CHANNEL_CAPACITY);
    let writer_task = tokio::spawn(write_outputs(writer, out_rx));

    let (stop_tx, stop_rx) = oneshot::channel();
    let forwarder = tokio::spawn(forward_events(events, out_tx.clone(), stop_rx));

    let mut in_flight = JoinSet::new();
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await.context("read bridge input failed")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (request_id, parsed) = parse_request(line);
        let handle = handle.clone();
        let surface = Arc::clone(&surface);
        let out_tx = out_tx.clone();
        in_flight.spawn(async move {
            let response = match parsed {
                Ok(message) => match resolve(message, &surface).await {
                    Ok(control) => handle.request(control).await,
                    Err(e) => ControlResponse::failure(e),
                },
                Err(e) => {
                    warn!(error = %e, "Rejected bridge request");
                    ControlResponse::failure(e)
                }
            };
            let line = BridgeOutput::Response(ResponseLine::new(request_id, response));
            if out_tx.send(line).await.is_err() {
                debug!("Bridge output closed before response");
            }
        });
    }

    info!("Bridge input closed");
    while in_flight.join_next().await.is_some() {}

    let _ = stop_tx.send(());
    forwarder.await.context("event forwarder panicked")?;
    drop(out_tx);
    writer_task.await.context("bridge writer panicked")?
}

async fn resolve(
    message: InboundMessage,
    surface: &InMemoryMenuSurface,
) -> Result<ControlMessage, ControlError> {
    match message.into_control() {
        Ok(control) => Ok(control),
        Err(entry_id) => surface
            .resolve(&entry_id)
            .await
            .map(ControlMessage::SelectMenuEntry)
            .ok_or_else(|| ControlError::NotFound(format!("Unknown menu entry: {entry_id}"))),
    }
}

async fn forward_events(
    mut events: HostEventReceiver,
    out_tx: mpsc::Sender<BridgeOutput>,
    mut stop: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => send_event(&out_tx, event).await,
                None => return,
            },
            _ = &mut stop => break,
        }
    }
    while let Ok(event) = events.try_recv() {
        send_event(&out_tx, event).await;
    }
}

async fn send_event(out_tx: &mpsc::Sender<BridgeOutput>, event: HostEvent) {
    if out_tx.send(BridgeOutput::Event(event)).await.is_err() {
        debug!("Bridge output closed, dropping host event");
    }
}

async fn write_outputs<W>(mut writer: W, mut out_rx: mpsc::Receiver<BridgeOutput>) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(output) = out_rx.recv().await {
        let mut line = serde_json::to_vec(&output).context("serialize bridge output failed")?;
        line.push(b'\n');
        writer
            .write_all(&line)
            .await
            .context("write bridge output failed")?;
        writer.flush().await.context("flush bridge output failed")?;
    }
    Ok(())
}
