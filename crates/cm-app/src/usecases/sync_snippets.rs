//! Cache Synchronizer
//! 缓存同步器
//!
//! Fetches the menu-eligible snippets and overwrites the cached set.
//! A failed fetch leaves the previous cache untouched.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, info_span, warn, Instrument};
use cm_core::ports::SnippetSourcePort;
use cm_core::{Credential, Endpoint, SnippetScope, SnippetSet, SyncError};

use crate::state::ExtensionState;
use crate::telemetry::Tracker;

/// Result of a synchronizer run that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Cache overwritten with this set.
    Synced(SnippetSet),
    /// No credential stored; nothing fetched.
    NoCredential,
}

pub struct SyncSnippets {
    state: Arc<ExtensionState>,
    source: Arc<dyn SnippetSourcePort>,
    tracker: Arc<Tracker>,
}

impl SyncSnippets {
    pub fn new(
        state: Arc<ExtensionState>,
        source: Arc<dyn SnippetSourcePort>,
        tracker: Arc<Tracker>,
    ) -> Self {
        Self {
            state,
            source,
            tracker,
        }
    }

    /// Read credential and endpoint from the store, then sync.
    ///
    /// # Returns / 返回值
    /// - `Ok(SyncOutcome::NoCredential)` without any network call when no credential is stored
    /// - `Ok(SyncOutcome::Synced(_))` after the cache was overwritten
    /// - `Err(SyncError)` when fetch or parse failed; cache unchanged
    pub async fn execute(&self) -> Result<SyncOutcome, SyncError> {
        let span = info_span!("usecase.sync_snippets.execute");

        async {
            let Some(credential) = self.state.credential().await? else {
                debug!("No credential stored, skipping sync");
                return Ok(SyncOutcome::NoCredential);
            };
            let endpoint = self.state.endpoint().await?;

            self.sync(&credential, &endpoint).await.map(SyncOutcome::Synced)
        }
        .instrument(span)
        .await
    }

    /// One fetch-and-cache cycle with an explicit credential and endpoint.
    pub async fn sync(
        &self,
        credential: &Credential,
        endpoint: &Endpoint,
    ) -> Result<SnippetSet, SyncError> {
        let page = match self
            .source
            .fetch_snippets(credential, endpoint, SnippetScope::MenuEligible)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, %endpoint, "Snippet fetch failed, keeping cached snippets");
                return Err(e);
            }
        };

        let snippets = SnippetSet::new(page.snippets);
        self.state.replace_cached_snippets(&snippets).await?;

        info!(count = snippets.len(), "Cached snippets replaced");
        self.tracker
            .track("snippets_synced", json!({ "count": snippets.len() }))
            .await;

        Ok(snippets)
    }
}
