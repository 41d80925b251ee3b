//! Quick-insert menu model.
//!
//! [`MenuState`] is derived, never persisted: it is a pure function of
//! whether a credential is present and the cached snippet set at rebuild time.
//! [`MenuEntry`] is the flat, host-facing rendering of that state.

use serde::{Deserialize, Serialize};

use crate::ids::SnippetId;
use crate::snippet::SnippetSet;
use crate::text::{truncate_with_ellipsis, MENU_LABEL_MAX_CHARS};

/// Prefix shared by every host-facing entry id.
pub const ENTRY_ID_PREFIX: &str = "clickmemory";

/// Host-facing id of the parent entry grouping all snippet entries.
pub const PARENT_ENTRY_ID: &str = "clickmemory-parent";

pub const PARENT_TITLE: &str = "ClickMemory";
pub const SETUP_TITLE: &str = "ClickMemory: Setup Required";
pub const NO_SNIPPETS_TITLE: &str = "ClickMemory: No snippets available";
pub const ERROR_TITLE: &str = "ClickMemory: Error loading snippets";

/// What selecting a menu entry means.
///
/// Carried alongside each entry instead of being re-parsed out of its id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "snippet_id", rename_all = "snake_case")]
pub enum MenuTarget {
    Setup,
    NoSnippets,
    Error,
    Snippet(SnippetId),
}

impl MenuTarget {
    /// Host-facing entry id for this target.
    pub fn entry_id(&self) -> String {
        match self {
            MenuTarget::Setup => format!("{ENTRY_ID_PREFIX}-setup"),
            MenuTarget::NoSnippets => format!("{ENTRY_ID_PREFIX}-no-snippets"),
            MenuTarget::Error => format!("{ENTRY_ID_PREFIX}-error"),
            MenuTarget::Snippet(id) => format!("{ENTRY_ID_PREFIX}-snippet-{id}"),
        }
    }

    /// Informational entries that route to the configuration surface.
    pub fn is_reserved(&self) -> bool {
        !matches!(self, MenuTarget::Snippet(_))
    }
}

/// One child of the parent entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub snippet_id: SnippetId,
    pub label: String,
}

/// Externally visible menu state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "items", rename_all = "snake_case")]
pub enum MenuState {
    SetupRequired,
    NoSnippets,
    Error,
    Snippets(Vec<MenuItem>),
}

impl MenuState {
    /// Decide the visible state. First match wins:
    /// no credential, then empty cache, then the snippet list.
    pub fn derive(credential_present: bool, snippets: &SnippetSet) -> Self {
        if !credential_present {
            return MenuState::SetupRequired;
        }
        if snippets.is_empty() {
            return MenuState::NoSnippets;
        }
        MenuState::Snippets(
            snippets
                .iter()
                .map(|s| MenuItem {
                    snippet_id: s.id.clone(),
                    label: truncate_with_ellipsis(&s.title, MENU_LABEL_MAX_CHARS).into_owned(),
                })
                .collect(),
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MenuState::SetupRequired => "setup_required",
            MenuState::NoSnippets => "no_snippets",
            MenuState::Error => "error",
            MenuState::Snippets(_) => "snippets",
        }
    }

    /// Flatten into host-facing entries, parent first.
    pub fn entries(&self) -> Vec<MenuEntry> {
        match self {
            MenuState::SetupRequired => vec![MenuEntry::informational(MenuTarget::Setup, SETUP_TITLE)],
            MenuState::NoSnippets => {
                vec![MenuEntry::informational(MenuTarget::NoSnippets, NO_SNIPPETS_TITLE)]
            }
            MenuState::Error => vec![MenuEntry::informational(MenuTarget::Error, ERROR_TITLE)],
            MenuState::Snippets(items) => {
                let mut entries = Vec::with_capacity(items.len() + 1);
                entries.push(MenuEntry {
                    id: PARENT_ENTRY_ID.to_string(),
                    parent_id: None,
                    title: PARENT_TITLE.to_string(),
                    target: None,
                });
                entries.extend(items.iter().map(|item| {
                    let target = MenuTarget::Snippet(item.snippet_id.clone());
                    MenuEntry {
                        id: target.entry_id(),
                        parent_id: Some(PARENT_ENTRY_ID.to_string()),
                        title: item.label.clone(),
                        target: Some(target),
                    }
                }));
                entries
            }
        }
    }
}

/// A single host-facing menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub title: String,
    /// `None` for the parent entry, which is not selectable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<MenuTarget>,
}

impl MenuEntry {
    fn informational(target: MenuTarget, title: &str) -> Self {
        Self {
            id: target.entry_id(),
            parent_id: None,
            title: title.to_string(),
            target: Some(target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snippet::Snippet;

    fn snippet(id: &str, title: &str) -> Snippet {
        Snippet {
            id: id.into(),
            title: title.to_string(),
            content: format!("content of {id}"),
            is_shared: false,
            is_menu_eligible: true,
        }
    }

    #[test]
    fn test_missing_credential_dominates_non_empty_cache() {
        let set = SnippetSet::new(vec![snippet("a", "Hello")]);
        assert_eq!(MenuState::derive(false, &set), MenuState::SetupRequired);
    }

    #[test]
    fn test_empty_cache_with_credential_is_no_snippets() {
        assert_eq!(
            MenuState::derive(true, &SnippetSet::empty()),
            MenuState::NoSnippets
        );
    }

    #[test]
    fn test_snippets_render_parent_then_children_in_fetch_order() {
        let set = SnippetSet::new(vec![snippet("2", "Second"), snippet("1", "First")]);
        let entries = MenuState::derive(true, &set).entries();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].id, PARENT_ENTRY_ID);
        assert!(entries[0].target.is_none());
        assert_eq!(entries[1].id, "clickmemory-snippet-2");
        assert_eq!(entries[1].parent_id.as_deref(), Some(PARENT_ENTRY_ID));
        assert_eq!(entries[1].target, Some(MenuTarget::Snippet("2".into())));
        assert_eq!(entries[2].title, "First");
    }

    #[test]
    fn test_long_titles_are_truncated_in_labels() {
        let long = "x".repeat(40);
        let set = SnippetSet::new(vec![snippet("a", &long)]);

        match MenuState::derive(true, &set) {
            MenuState::Snippets(items) => {
                assert_eq!(items[0].label, format!("{}...", "x".repeat(30)));
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn test_informational_entries_use_reserved_targets() {
        for (state, id) in [
            (MenuState::SetupRequired, "clickmemory-setup"),
            (MenuState::NoSnippets, "clickmemory-no-snippets"),
            (MenuState::Error, "clickmemory-error"),
        ] {
            let entries = state.entries();
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].id, id);
            assert!(entries[0].target.as_ref().is_some_and(MenuTarget::is_reserved));
        }
    }

    #[test]
    fn test_derive_is_deterministic() {
        let set = SnippetSet::new(vec![snippet("a", "Hello"), snippet("b", "World")]);
        assert_eq!(
            MenuState::derive(true, &set).entries(),
            MenuState::derive(true, &set).entries()
        );
    }
}
