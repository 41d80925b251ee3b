use serde_json::Value;

use crate::endpoint::Endpoint;
use crate::ids::InstallId;

#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryEvent {
    pub name: String,
    pub properties: Value,
}

impl TelemetryEvent {
    pub fn new(name: impl Into<String>, properties: Value) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }
}

/// Best-effort usage tracking.
///
/// Fire-and-forget: implementations must not block the caller and must
/// swallow every failure.
pub trait TelemetryPort: Send + Sync {
    fn track(&self, endpoint: &Endpoint, user_id: &InstallId, event: TelemetryEvent);
}
