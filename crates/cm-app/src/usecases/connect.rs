//! Connect a credential
//! 连接凭证
//!
//! Validates the key format, proves it against the remote source, saves it,
//! then fills the cache and rebuilds the menu from it.

use std::sync::Arc;

use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, info_span, warn, Instrument};
use cm_core::ports::{SnippetSourcePort, StoreError};
use cm_core::{Credential, CredentialError, SnippetScope, SyncError};

use super::menu::MenuBuilder;
use super::sync_snippets::SyncSnippets;
use crate::state::ExtensionState;
use crate::telemetry::Tracker;

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("Invalid API key format: {0}")]
    InvalidCredential(#[from] CredentialError),

    #[error("Connection failed: {0}")]
    Rejected(#[source] SyncError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct Connect {
    state: Arc<ExtensionState>,
    source: Arc<dyn SnippetSourcePort>,
    sync: Arc<SyncSnippets>,
    builder: Arc<MenuBuilder>,
    tracker: Arc<Tracker>,
}

impl Connect {
    pub fn new(
        state: Arc<ExtensionState>,
        source: Arc<dyn SnippetSourcePort>,
        sync: Arc<SyncSnippets>,
        builder: Arc<MenuBuilder>,
        tracker: Arc<Tracker>,
    ) -> Self {
        Self {
            state,
            source,
            sync,
            builder,
            tracker,
        }
    }

    /// Returns the number of snippets the credential can see.
    ///
    /// A malformed key is rejected before any network call. The follow-up
    /// cache sync is best effort: its failure is logged, the key stays saved.
    /// A successful sync is always followed by a rebuild, so the menu does not
    /// depend on the debounced rebuild racing a slow fetch.
    pub async fn execute(&self, raw_key: &str) -> Result<u64, ConnectError> {
        let span = info_span!("usecase.connect.execute");

        async {
            let credential = Credential::parse(raw_key)?;
            let endpoint = self.state.endpoint().await?;

            let page = self
                .source
                .fetch_snippets(&credential, &endpoint, SnippetScope::All)
                .await
                .map_err(ConnectError::Rejected)?;
            let total = page.total();

            self.state.set_credential(&credential).await?;
            info!(total, %endpoint, "Credential connected");
            self.tracker
                .track("extension_connected", json!({ "snippetCount": total }))
                .await;

            match self.sync.sync(&credential, &endpoint).await {
                Ok(_) => {
                    let outcome = self.builder.rebuild_menu().await;
                    debug!(skipped = outcome.is_skipped(), "Menu refresh after connect");
                }
                Err(e) => warn!(error = %e, "Initial cache sync after connect failed"),
            }

            Ok(total)
        }
        .instrument(span)
        .await
    }
}
