//! Use case for updating user settings
//! 更新用户设置的用例

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, info_span, Instrument};
use cm_core::{Endpoint, UserSettings};

use crate::state::ExtensionState;

/// Use case for updating user settings.
///
/// ## Behavior / 行为
/// - Loads current settings and endpoint for comparison
/// - A blank endpoint removes the override (configured default applies)
/// - Logs changed fields with old/new values
/// - Persists settings and endpoint in one store write
pub struct UpdateSettings {
    state: Arc<ExtensionState>,
}

impl UpdateSettings {
    pub fn new(state: Arc<ExtensionState>) -> Self {
        Self { state }
    }

    /// Returns the endpoint in effect after the update.
    pub async fn execute(&self, endpoint: Option<String>, settings: UserSettings) -> Result<Endpoint> {
        let span = info_span!("usecase.update_settings.execute");

        async {
            let old_settings = self.state.settings().await?;
            let old_endpoint = self.state.endpoint().await?;

            let endpoint_override = endpoint
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(Endpoint::new);
            let new_endpoint = endpoint_override
                .clone()
                .unwrap_or_else(|| self.state.default_endpoint().clone());

            let changes = SettingsDiff::diff(&old_settings, &settings, &old_endpoint, &new_endpoint);
            if !changes.is_empty() {
                info!(
                    changed_fields = %changes.to_log_string(),
                    "Updating user settings"
                );
            } else {
                info!("Updating user settings (no changes detected)");
            }

            self.state
                .save_settings(&settings, endpoint_override.as_ref())
                .await
                .context("failed to save settings")?;

            Ok(new_endpoint)
        }
        .instrument(span)
        .await
    }
}

/// Represents the difference between two settings snapshots
struct SettingsDiff {
    endpoint: Option<(String, String)>,
    show_shared_snippets: Option<(bool, bool)>,
    show_snippet_preview: Option<(bool, bool)>,
}

impl SettingsDiff {
    fn diff(old: &UserSettings, new: &UserSettings, old_endpoint: &Endpoint, new_endpoint: &Endpoint) -> Self {
        Self {
            endpoint: (old_endpoint != new_endpoint)
                .then(|| (old_endpoint.to_string(), new_endpoint.to_string())),
            show_shared_snippets: (old.show_shared_snippets != new.show_shared_snippets)
                .then_some((old.show_shared_snippets, new.show_shared_snippets)),
            show_snippet_preview: (old.show_snippet_preview != new.show_snippet_preview)
                .then_some((old.show_snippet_preview, new.show_snippet_preview)),
        }
    }

    fn is_empty(&self) -> bool {
        self.endpoint.is_none()
            && self.show_shared_snippets.is_none()
            && self.show_snippet_preview.is_none()
    }

    fn to_log_string(&self) -> String {
        let mut parts = Vec::new();

        if let Some((old, new)) = &self.endpoint {
            parts.push(format!("webAppUrl: {old} -> {new}"));
        }
        if let Some((old, new)) = self.show_shared_snippets {
            parts.push(format!("showSharedSnippets: {old} -> {new}"));
        }
        if let Some((old, new)) = self.show_snippet_preview {
            parts.push(format!("showSnippetPreview: {old} -> {new}"));
        }

        if parts.is_empty() {
            "(no changes)".to_string()
        } else {
            parts.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cm_infra::store::InMemoryKeyValueStore;

    fn use_case() -> (Arc<ExtensionState>, UpdateSettings) {
        let state = Arc::new(ExtensionState::new(
            Arc::new(InMemoryKeyValueStore::new()),
            Endpoint::new("https://default.test"),
        ));
        (state.clone(), UpdateSettings::new(state))
    }

    #[tokio::test]
    async fn test_blank_endpoint_resets_to_default() {
        let (state, uc) = use_case();

        let endpoint = uc
            .execute(Some("http://localhost:3000/".to_string()), UserSettings::default())
            .await
            .unwrap();
        assert_eq!(endpoint.as_str(), "http://localhost:3000");
        assert_eq!(state.endpoint().await.unwrap(), endpoint);

        let endpoint = uc
            .execute(Some("   ".to_string()), UserSettings::default())
            .await
            .unwrap();
        assert_eq!(endpoint.as_str(), "https://default.test");
        assert!(state.endpoint_override().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_settings_persisted() {
        let (state, uc) = use_case();
        let settings = UserSettings {
            show_shared_snippets: false,
            show_snippet_preview: true,
        };

        uc.execute(None, settings.clone()).await.unwrap();

        assert_eq!(state.settings().await.unwrap(), settings);
    }

    #[test]
    fn test_diff_lists_only_changed_fields() {
        let old = UserSettings::default();
        let new = UserSettings {
            show_snippet_preview: false,
            ..UserSettings::default()
        };
        let endpoint = Endpoint::new("https://a.test");

        let diff = SettingsDiff::diff(&old, &new, &endpoint, &endpoint);
        assert!(!diff.is_empty());
        assert_eq!(diff.to_log_string(), "showSnippetPreview: true -> false");

        let diff = SettingsDiff::diff(&old, &old, &endpoint, &endpoint);
        assert!(diff.is_empty());
    }
}
