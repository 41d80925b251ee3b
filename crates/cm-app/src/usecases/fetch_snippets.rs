//! Explicit fetch requested by the popup.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info_span, Instrument};
use cm_core::ports::SnippetSourcePort;
use cm_core::{SnippetScope, SyncError};

use super::list_popup_snippets::{project, PopupQuery, SnippetPreview};
use super::menu::MenuBuilder;
use super::sync_snippets::SyncSnippets;
use crate::state::ExtensionState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedSnippets {
    pub snippets: Vec<SnippetPreview>,
    /// Count reported by the server before popup filters.
    pub total_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Fetched(FetchedSnippets),
    NoCredential,
}

/// Fetch snippets on demand.
///
/// - `MenuEligible`: runs the Cache Synchronizer, then rebuilds the menu
/// - `All`: fetches the full list for display only, the cache is left alone
pub struct FetchSnippets {
    state: Arc<ExtensionState>,
    source: Arc<dyn SnippetSourcePort>,
    sync: Arc<SyncSnippets>,
    builder: Arc<MenuBuilder>,
}

impl FetchSnippets {
    pub fn new(
        state: Arc<ExtensionState>,
        source: Arc<dyn SnippetSourcePort>,
        sync: Arc<SyncSnippets>,
        builder: Arc<MenuBuilder>,
    ) -> Self {
        Self {
            state,
            source,
            sync,
            builder,
        }
    }

    pub async fn execute(
        &self,
        scope: SnippetScope,
        query: PopupQuery,
    ) -> Result<FetchOutcome, SyncError> {
        let span = info_span!("usecase.fetch_snippets.execute", ?scope);

        async {
            let Some(credential) = self.state.credential().await? else {
                return Ok(FetchOutcome::NoCredential);
            };
            let endpoint = self.state.endpoint().await?;
            let settings = self.state.settings().await?;

            let (snippets, total_count) = match scope {
                SnippetScope::MenuEligible => {
                    let set = self.sync.sync(&credential, &endpoint).await?;
                    let outcome = self.builder.rebuild_menu().await;
                    debug!(skipped = outcome.is_skipped(), "Menu refresh after fetch");
                    let total = set.len() as u64;
                    (set.into_vec(), total)
                }
                SnippetScope::All => {
                    let page = self
                        .source
                        .fetch_snippets(&credential, &endpoint, SnippetScope::All)
                        .await?;
                    let total = page.total();
                    (page.snippets, total)
                }
            };

            Ok(FetchOutcome::Fetched(FetchedSnippets {
                snippets: project(&snippets, &settings, &query),
                total_count,
            }))
        }
        .instrument(span)
        .await
    }
}
