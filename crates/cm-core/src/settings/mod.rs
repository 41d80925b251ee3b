//! User-visible preferences persisted under the `settings` store key.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    /// Show snippets shared with the user in the popup list.
    #[serde(default = "default_true")]
    pub show_shared_snippets: bool,

    /// Show a content preview under each title in the popup list.
    #[serde(default = "default_true")]
    pub show_snippet_preview: bool,
}

fn default_true() -> bool {
    true
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            show_shared_snippets: true,
            show_snippet_preview: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: UserSettings =
            serde_json::from_str(r#"{"showSnippetPreview": false}"#).unwrap();
        assert!(settings.show_shared_snippets);
        assert!(!settings.show_snippet_preview);
    }
}
