//! First-run store initialization.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, info_span, Instrument};
use cm_core::ports::StoreKey;

use crate::state::ExtensionState;

/// Writes defaults for missing keys: endpoint override, settings, install id.
///
/// Existing values are never overwritten, so running it on every start is safe.
pub struct InitializeStore {
    state: Arc<ExtensionState>,
}

impl InitializeStore {
    pub fn new(state: Arc<ExtensionState>) -> Self {
        Self { state }
    }

    pub async fn execute(&self) -> Result<Vec<StoreKey>> {
        let span = info_span!("usecase.initialize_store.execute");

        async {
            let written = self
                .state
                .write_missing_defaults()
                .await
                .context("failed to write store defaults")?;

            if written.is_empty() {
                info!("Store already initialized");
            } else {
                let keys: Vec<&str> = written.iter().map(StoreKey::as_str).collect();
                info!(keys = ?keys, "Initialized store defaults");
            }
            Ok(written)
        }
        .instrument(span)
        .await
    }
}
