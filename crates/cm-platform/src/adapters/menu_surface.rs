//! Menu surface kept in memory and published to the host on commit.
//! 内存菜单面，提交时推送给宿主

use anyhow::{bail, Result};
use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};
use cm_core::ports::MenuSurfacePort;
use cm_core::{MenuEntry, MenuTarget};

use crate::ipc::HostEvent;
use crate::runtime::HostEventSender;

/// Entries are staged between `remove_all` and `commit`; the host only ever
/// sees complete menus.
///
/// The published list is also what the bridge resolves clicked entry ids
/// against, so a click always maps to an entry the host was shown.
pub struct InMemoryMenuSurface {
    staged: Mutex<Vec<MenuEntry>>,
    published: RwLock<Vec<MenuEntry>>,
    events: HostEventSender,
}

impl InMemoryMenuSurface {
    pub fn new(events: HostEventSender) -> Self {
        Self {
            staged: Mutex::new(Vec::new()),
            published: RwLock::new(Vec::new()),
            events,
        }
    }

    /// Decode a host-facing entry id. Unknown ids and the parent entry give `None`.
    pub async fn resolve(&self, entry_id: &str) -> Option<MenuTarget> {
        let target = self
            .published
            .read()
            .await
            .iter()
            .find(|e| e.id == entry_id)
            .and_then(|e| e.target.clone());
        if target.is_none() {
            warn!(entry_id, "Unknown menu entry id");
        }
        target
    }

    /// Entries currently shown by the host.
    pub async fn snapshot(&self) -> Vec<MenuEntry> {
        self.published.read().await.clone()
    }
}

#[async_trait]
impl MenuSurfacePort for InMemoryMenuSurface {
    async fn remove_all(&self) -> Result<()> {
        self.staged.lock().await.clear();
        Ok(())
    }

    async fn create(&self, entry: MenuEntry) -> Result<()> {
        let mut staged = self.staged.lock().await;
        if staged.iter().any(|e| e.id == entry.id) {
            bail!("menu entry id already exists: {}", entry.id);
        }
        if let Some(parent) = &entry.parent_id {
            if !staged.iter().any(|e| &e.id == parent) {
                bail!("parent menu entry not found: {parent}");
            }
        }
        staged.push(entry);
        Ok(())
    }

    async fn commit(&self) -> Result<()> {
        let entries = self.staged.lock().await.clone();
        *self.published.write().await = entries.clone();
        debug!(count = entries.len(), "Publishing menu");
        self.events
            .send(HostEvent::MenuUpdated { entries })
            .await
            .map_err(|_| anyhow::anyhow!("host event channel closed"))
    }
}
