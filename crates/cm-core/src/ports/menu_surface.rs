use async_trait::async_trait;

use crate::menu::MenuEntry;

/// The externally visible menu owned by the host shell.
///
/// Mirrors the browser context-menu API: entries are removed wholesale and
/// recreated one by one. `commit` publishes the entries created since the last
/// `remove_all`.
#[async_trait]
pub trait MenuSurfacePort: Send + Sync {
    async fn remove_all(&self) -> anyhow::Result<()>;

    /// Fails if an entry with the same id already exists.
    async fn create(&self, entry: MenuEntry) -> anyhow::Result<()>;

    async fn commit(&self) -> anyhow::Result<()>;
}
