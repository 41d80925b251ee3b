//! Snippet domain model.
//!
//! The remote source is authoritative. Locally we only hold wholesale copies
//! of what it returned, in the order it returned them.

use serde::{Deserialize, Serialize};

use crate::ids::SnippetId;

/// A user-authored reusable text fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: SnippetId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub is_shared: bool,

    /// Whether the remote source allows this snippet in the quick-insert menu.
    #[serde(default, alias = "is_public", alias = "context_menu")]
    pub is_menu_eligible: bool,
}

/// Which subset of snippets to request from the remote source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnippetScope {
    /// Every snippet visible to the credential (popup view).
    All,
    /// Only snippets flagged for the quick-insert menu.
    #[default]
    MenuEligible,
}

/// Success body of `GET /api/snippets`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SnippetPage {
    /// A missing field is an empty list, not an error.
    #[serde(default)]
    pub snippets: Vec<Snippet>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
}

impl SnippetPage {
    /// Count reported by the server, or the list length when absent.
    pub fn total(&self) -> u64 {
        self.total_count.unwrap_or(self.snippets.len() as u64)
    }
}

/// An ordered, wholesale snapshot of snippets as last fetched.
///
/// Never merged field-by-field: a new fetch replaces the whole set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnippetSet(Vec<Snippet>);

impl SnippetSet {
    pub fn new(snippets: Vec<Snippet>) -> Self {
        Self(snippets)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Snippet> {
        self.0.iter()
    }

    pub fn find(&self, id: &SnippetId) -> Option<&Snippet> {
        self.0.iter().find(|s| &s.id == id)
    }

    pub fn as_slice(&self) -> &[Snippet] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Snippet> {
        self.0
    }
}

impl From<Vec<Snippet>> for SnippetSet {
    fn from(snippets: Vec<Snippet>) -> Self {
        Self(snippets)
    }
}

impl<'a> IntoIterator for &'a SnippetSet {
    type Item = &'a Snippet;
    type IntoIter = std::slice::Iter<'a, Snippet>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
