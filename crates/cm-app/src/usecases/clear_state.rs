//! Disconnect: wipe every persisted key, restore first-run defaults, then rebuild.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, info_span, Instrument};

use super::menu::{MenuBuilder, RebuildOutcome};
use crate::state::ExtensionState;

pub struct ClearState {
    state: Arc<ExtensionState>,
    builder: Arc<MenuBuilder>,
}

impl ClearState {
    pub fn new(state: Arc<ExtensionState>, builder: Arc<MenuBuilder>) -> Self {
        Self { state, builder }
    }

    /// The menu ends up "setup required". Endpoint, settings and a fresh
    /// install id are written back so telemetry keeps working without a
    /// restart. Returns `Skipped` when another rebuild holds the guard.
    pub async fn execute(&self) -> Result<RebuildOutcome> {
        let span = info_span!("usecase.clear_state.execute");

        async {
            self.state.clear().await.context("failed to clear store")?;
            let restored = self
                .state
                .write_missing_defaults()
                .await
                .context("failed to restore default keys")?;
            info!(restored = restored.len(), "Extension state cleared");
            Ok(self.builder.rebuild_menu().await)
        }
        .instrument(span)
        .await
    }
}
