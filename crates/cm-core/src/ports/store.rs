use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;

/// Logical keys of the persistent key-value store.
///
/// The string names match what the browser extension historically wrote, so
/// an exported extension storage dump can be loaded as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// Bearer credential (`apiKey`).
    Credential,
    /// User override of the web app URL (`webAppUrl`).
    EndpointOverride,
    /// Latest successfully fetched menu-eligible snippets (`cachedSnippets`).
    CachedSnippets,
    /// Snippets the menu was last built from (`contextMenuSnippets`).
    MenuSnippets,
    /// [`crate::settings::UserSettings`] (`settings`).
    Settings,
    /// Random telemetry user id (`installId`).
    InstallId,
}

impl StoreKey {
    pub const ALL: [StoreKey; 6] = [
        StoreKey::Credential,
        StoreKey::EndpointOverride,
        StoreKey::CachedSnippets,
        StoreKey::MenuSnippets,
        StoreKey::Settings,
        StoreKey::InstallId,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Credential => "apiKey",
            StoreKey::EndpointOverride => "webAppUrl",
            StoreKey::CachedSnippets => "cachedSnippets",
            StoreKey::MenuSnippets => "contextMenuSnippets",
            StoreKey::Settings => "settings",
            StoreKey::InstallId => "installId",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl std::fmt::Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification that one or more keys changed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    pub keys: Vec<StoreKey>,
}

impl StoreChange {
    pub fn touches(&self, key: StoreKey) -> bool {
        self.keys.contains(&key)
    }

    pub fn touches_any(&self, keys: &[StoreKey]) -> bool {
        keys.iter().any(|k| self.touches(*k))
    }
}

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(String),

    #[error("store serialization error: {0}")]
    Serialization(String),
}

/// Durable local storage keyed by [`StoreKey`], doubling as a change bus.
///
/// # Behavior / 行为
/// - `set` writes all entries as one unit; readers never observe half of it.
/// - A [`StoreChange`] is broadcast after a write that changed at least one
///   value. Writing an identical value is not a change.
/// - `clear` removes every key.
#[async_trait]
pub trait KeyValueStorePort: Send + Sync {
    async fn get(&self, key: StoreKey) -> Result<Option<Value>, StoreError>;

    async fn set(&self, entries: Vec<(StoreKey, Value)>) -> Result<(), StoreError>;

    async fn remove(&self, keys: &[StoreKey]) -> Result<(), StoreError>;

    async fn clear(&self) -> Result<(), StoreError>;

    /// Subscribe to change notifications from this point on.
    fn subscribe(&self) -> broadcast::Receiver<StoreChange>;
}
