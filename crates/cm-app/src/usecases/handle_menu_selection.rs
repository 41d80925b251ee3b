//! Menu Selection Handler
//! 菜单选择处理
//!
//! Resolves a selected menu target against the snapshot the menu was built
//! from and inserts the snippet content. Never mutates the cache.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::{info, info_span, warn, Instrument};
use cm_core::ports::{TextInsertionPort, UiPort};
use cm_core::{MenuTarget, SnippetId};

use crate::state::ExtensionState;
use crate::telemetry::Tracker;

pub const SETUP_PATH: &str = "/auth";
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Snippet content was handed to the insertion capability once.
    Inserted(SnippetId),
    /// An informational entry opened the configuration surface.
    OpenedConfiguration(String),
    /// Selected id is not in the menu snapshot (stale menu). Nothing inserted.
    SnippetNotFound(SnippetId),
}

pub struct HandleMenuSelection {
    state: Arc<ExtensionState>,
    inserter: Arc<dyn TextInsertionPort>,
    ui: Arc<dyn UiPort>,
    tracker: Arc<Tracker>,
}

impl HandleMenuSelection {
    pub fn new(
        state: Arc<ExtensionState>,
        inserter: Arc<dyn TextInsertionPort>,
        ui: Arc<dyn UiPort>,
        tracker: Arc<Tracker>,
    ) -> Self {
        Self {
            state,
            inserter,
            ui,
            tracker,
        }
    }

    pub async fn execute(&self, target: MenuTarget) -> Result<SelectionOutcome> {
        let span = info_span!("usecase.handle_menu_selection.execute", entry = %target.entry_id());

        async {
            let id = match target {
                MenuTarget::Setup => return self.open(SETUP_PATH).await,
                MenuTarget::NoSnippets | MenuTarget::Error => {
                    return self.open(DASHBOARD_PATH).await
                }
                MenuTarget::Snippet(id) => id,
            };

            let snapshot = self
                .state
                .menu_snippets()
                .await
                .context("failed to read menu snapshot")?;

            let Some(snippet) = snapshot.find(&id) else {
                warn!(snippet_id = %id, "Snippet not found in menu snapshot");
                return Ok(SelectionOutcome::SnippetNotFound(id));
            };

            self.inserter
                .insert_text(&snippet.content)
                .await
                .context("failed to insert snippet text")?;

            info!(snippet_id = %id, "Snippet inserted");
            self.tracker
                .track(
                    "snippet_inserted",
                    json!({ "snippetId": id.as_str(), "source": "context_menu" }),
                )
                .await;

            Ok(SelectionOutcome::Inserted(id))
        }
        .instrument(span)
        .await
    }

    async fn open(&self, path: &str) -> Result<SelectionOutcome> {
        let endpoint = self
            .state
            .endpoint()
            .await
            .context("failed to read endpoint")?;
        let url = endpoint.join(path);

        self.ui
            .open_configuration(&url)
            .await
            .with_context(|| format!("failed to open {url}"))?;

        info!(%url, "Opened configuration surface");
        Ok(SelectionOutcome::OpenedConfiguration(url))
    }
}
