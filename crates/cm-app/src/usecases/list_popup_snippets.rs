//! Popup list projection
//! 弹出窗口列表投影

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info_span, Instrument};
use cm_core::text::{truncate_with_ellipsis, PREVIEW_MAX_CHARS};
use cm_core::{Snippet, SnippetId, SnippetSet, UserSettings};

use crate::state::ExtensionState;

/// One row of the popup list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetPreview {
    pub id: SnippetId,
    pub title: String,
    /// `None` when previews are turned off in settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    pub is_shared: bool,
}

/// Filters applied to a popup listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopupQuery {
    /// Case-insensitive substring matched against title and content.
    pub search: Option<String>,
}

impl PopupQuery {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
        }
    }

    fn needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

/// Project snippets into popup rows, keeping fetch order.
pub fn project(snippets: &[Snippet], settings: &UserSettings, query: &PopupQuery) -> Vec<SnippetPreview> {
    let needle = query.needle();

    snippets
        .iter()
        .filter(|s| settings.show_shared_snippets || !s.is_shared)
        .filter(|s| match &needle {
            Some(needle) => {
                s.title.to_lowercase().contains(needle) || s.content.to_lowercase().contains(needle)
            }
            None => true,
        })
        .map(|s| SnippetPreview {
            id: s.id.clone(),
            title: s.title.clone(),
            preview: settings
                .show_snippet_preview
                .then(|| truncate_with_ellipsis(&s.content, PREVIEW_MAX_CHARS).into_owned()),
            is_shared: s.is_shared,
        })
        .collect()
}

/// List the cached snippets for the popup without touching the network.
pub struct ListPopupSnippets {
    state: Arc<ExtensionState>,
}

impl ListPopupSnippets {
    pub fn new(state: Arc<ExtensionState>) -> Self {
        Self { state }
    }

    pub async fn execute(&self, query: PopupQuery) -> Result<Vec<SnippetPreview>> {
        let span = info_span!("usecase.list_popup_snippets.execute");

        async {
            let snippets: SnippetSet = self
                .state
                .cached_snippets()
                .await
                .context("failed to read cached snippets")?;
            let settings = self.state.settings().await.context("failed to read settings")?;

            let rows = project(snippets.as_slice(), &settings, &query);
            debug!(total = snippets.len(), shown = rows.len(), "Listed popup snippets");
            Ok(rows)
        }
        .instrument(span)
        .await
    }
}
