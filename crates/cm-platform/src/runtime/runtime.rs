use std::sync::Arc;

use serde_json::{json, Value};
use tokio::sync::oneshot;
use tracing::{debug, info, info_span, Instrument};
use cm_app::usecases::{ConnectError, FetchOutcome, RebuildOutcome, SelectionOutcome};
use cm_app::App;

use super::event_bus::{ControlReceiver, ControlSender};
use super::response::{ControlError, ControlResponse};
use crate::ipc::{ControlMessage, ControlRequest};

/// Receives control requests and runs each one as its own task.
///
/// Requests interleave at their `.await` points; overlapping rebuilds are
/// settled by the menu builder's guard, not by this loop.
pub struct ExtensionRuntime {
    app: Arc<App>,
    control_rx: ControlReceiver,
    shutting_down: bool,
}

impl ExtensionRuntime {
    pub fn new(app: Arc<App>, control_rx: ControlReceiver) -> Self {
        Self {
            app,
            control_rx,
            shutting_down: false,
        }
    }

    pub async fn start(mut self) {
        info!("Extension runtime started");
        while !self.shutting_down {
            match self.control_rx.recv().await {
                Some(request) => self.handle_request(request),
                None => {
                    debug!("Control channel closed");
                    break;
                }
            }
        }
        self.app.shutdown().await;
        info!("Extension runtime stopped");
    }

    fn handle_request(&mut self, request: ControlRequest) {
        let ControlRequest { message, reply } = request;

        if matches!(message, ControlMessage::Shutdown) {
            self.shutting_down = true;
            info!("Extension runtime shutting down");
            let _ = reply.send(ControlResponse::ok(None));
            return;
        }

        let app = Arc::clone(&self.app);
        let span = info_span!("runtime.control", message = message.name());
        tokio::spawn(
            async move {
                let response = ControlResponse::from(dispatch(&app, message).await);
                if !response.success {
                    debug!(status = ?response.status, error = ?response.error, "Control message failed");
                }
                if reply.send(response).is_err() {
                    debug!("Control caller went away before the response");
                }
            }
            .instrument(span),
        );
    }
}

fn to_data<T: serde::Serialize>(value: &T) -> Result<Option<Value>, ControlError> {
    serde_json::to_value(value)
        .map(Some)
        .map_err(ControlError::failed)
}

async fn dispatch(app: &App, message: ControlMessage) -> Result<Option<Value>, ControlError> {
    match message {
        ControlMessage::RebuildMenu => match app.menu_builder.rebuild_menu().await {
            RebuildOutcome::Skipped => Err(ControlError::RebuildInProgress),
            RebuildOutcome::Rebuilt(state) => Ok(Some(json!({ "state": state.kind() }))),
        },

        ControlMessage::FetchSnippets { scope, query } => {
            match app.fetch_snippets.execute(scope, query).await {
                Ok(FetchOutcome::Fetched(fetched)) => to_data(&fetched),
                Ok(FetchOutcome::NoCredential) => Err(ControlError::NoCredential),
                Err(e) => Err(ControlError::Failed(e.user_message())),
            }
        }

        ControlMessage::ClearState => {
            let outcome = app
                .clear_state
                .execute()
                .await
                .map_err(|e| ControlError::failed(format!("{e:#}")))?;
            Ok(Some(json!({ "rebuilt": !outcome.is_skipped() })))
        }

        ControlMessage::Connect { api_key } => match app.connect.execute(&api_key).await {
            Ok(total) => Ok(Some(json!({ "totalCount": total }))),
            Err(e @ ConnectError::InvalidCredential(_)) => {
                Err(ControlError::InvalidCredential(e.to_string()))
            }
            Err(ConnectError::Rejected(e)) => Err(ControlError::Failed(e.user_message())),
            Err(e) => Err(ControlError::failed(e)),
        },

        ControlMessage::UpdateSettings { endpoint, settings } => {
            let endpoint = app
                .update_settings
                .execute(endpoint, settings)
                .await
                .map_err(|e| ControlError::failed(format!("{e:#}")))?;
            Ok(Some(json!({ "webAppUrl": endpoint.as_str() })))
        }

        ControlMessage::SelectMenuEntry(target) => {
            match app.handle_menu_selection.execute(target).await {
                Ok(SelectionOutcome::Inserted(id)) => Ok(Some(json!({ "inserted": id.as_str() }))),
                Ok(SelectionOutcome::OpenedConfiguration(url)) => Ok(Some(json!({ "opened": url }))),
                Ok(SelectionOutcome::SnippetNotFound(id)) => Err(ControlError::NotFound(format!(
                    "Snippet not found in cache: {id}"
                ))),
                Err(e) => Err(ControlError::failed(format!("{e:#}"))),
            }
        }

        // Handled by the loop before dispatch.
        ControlMessage::Shutdown => Ok(None),
    }
}

/// Cloneable front door to a running [`ExtensionRuntime`].
#[derive(Debug, Clone)]
pub struct RuntimeHandle {
    control_tx: ControlSender,
}

impl RuntimeHandle {
    pub fn new(control_tx: ControlSender) -> Self {
        Self { control_tx }
    }

    /// Send a message and wait for its response.
    pub async fn request(&self, message: ControlMessage) -> ControlResponse {
        let (reply, response) = oneshot::channel();
        if self
            .control_tx
            .send(ControlRequest { message, reply })
            .await
            .is_err()
        {
            return ControlResponse::failure(ControlError::Failed(
                "extension runtime stopped".to_string(),
            ));
        }

        response.await.unwrap_or_else(|_| {
            ControlResponse::failure(ControlError::Failed(
                "extension runtime dropped the request".to_string(),
            ))
        })
    }
}
