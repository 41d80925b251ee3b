use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use cm_core::ports::{TelemetryEvent, TelemetryPort};
use cm_core::{Endpoint, InstallId};

use super::build_client;

const TRACK_PATH: &str = "/api/track";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TrackBody<'a> {
    event_name: &'a str,
    properties: &'a Value,
    user_id: &'a str,
}

/// Fire-and-forget `POST {endpoint}/api/track`.
///
/// Must be called from within a tokio runtime. Failures are logged at debug
/// and dropped.
pub struct HttpTelemetry {
    client: reqwest::Client,
}

impl HttpTelemetry {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
        })
    }
}

impl TelemetryPort for HttpTelemetry {
    fn track(&self, endpoint: &Endpoint, user_id: &InstallId, event: TelemetryEvent) {
        let url = endpoint.join(TRACK_PATH);
        let request = self.client.post(&url).json(&TrackBody {
            event_name: &event.name,
            properties: &event.properties,
            user_id: user_id.as_str(),
        });

        tokio::spawn(async move {
            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(event = %event.name, "Telemetry event sent");
                }
                Ok(response) => {
                    debug!(event = %event.name, status = response.status().as_u16(), "Telemetry event rejected");
                }
                Err(e) => {
                    debug!(event = %event.name, error = %e, "Telemetry event failed");
                }
            }
        });
    }
}

/// Used when telemetry is disabled in config.
#[derive(Debug, Default)]
pub struct NoopTelemetry;

impl TelemetryPort for NoopTelemetry {
    fn track(&self, _endpoint: &Endpoint, _user_id: &InstallId, event: TelemetryEvent) {
        debug!(event = %event.name, "Telemetry disabled, event dropped");
    }
}
