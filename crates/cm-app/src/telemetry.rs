//! Best-effort usage events.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;
use cm_core::ports::{TelemetryEvent, TelemetryPort};

use crate::state::ExtensionState;

/// Resolves endpoint and install id, then hands the event to the port.
///
/// Never fails. Missing install id or an unreadable store drops the event.
pub struct Tracker {
    state: Arc<ExtensionState>,
    port: Arc<dyn TelemetryPort>,
}

impl Tracker {
    pub fn new(state: Arc<ExtensionState>, port: Arc<dyn TelemetryPort>) -> Self {
        Self { state, port }
    }

    pub async fn track(&self, name: &str, properties: Value) {
        let endpoint = match self.state.endpoint().await {
            Ok(endpoint) => endpoint,
            Err(e) => {
                debug!(event = name, error = %e, "Dropping telemetry event");
                return;
            }
        };
        let user_id = match self.state.install_id().await {
            Ok(Some(id)) => id,
            Ok(None) => {
                debug!(event = name, "No install id yet, dropping telemetry event");
                return;
            }
            Err(e) => {
                debug!(event = name, error = %e, "Dropping telemetry event");
                return;
            }
        };

        self.port
            .track(&endpoint, &user_id, TelemetryEvent::new(name, properties));
    }
}
