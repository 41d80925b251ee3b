use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// Random per-installation identifier, sent as `userId` with telemetry events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstallId(String);

impl InstallId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for InstallId {
    fn default() -> Self {
        Self::new()
    }
}

impl_id!(InstallId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_id_is_random() {
        assert_ne!(InstallId::new(), InstallId::new());
    }
}
