use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::fs;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info};
use cm_core::ports::{KeyValueStorePort, StoreChange, StoreError, StoreKey};

use super::{publish, StoreData, CHANGE_CHANNEL_CAPACITY};

/// Key-value store persisted as one JSON object on disk.
///
/// Every mutation rewrites the whole file through a temp file + rename, so the
/// file holds either the previous or the new contents. Writes are serialized
/// behind one async mutex; the in-memory copy only changes after the file did.
pub struct JsonFileKeyValueStore {
    path: PathBuf,
    data: Mutex<StoreData>,
    changes: broadcast::Sender<StoreChange>,
}

impl JsonFileKeyValueStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = match fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => StoreData::default(),
            Ok(content) => {
                let values: Map<String, Value> = serde_json::from_str(&content)
                    .with_context(|| format!("parse store failed: {}", path.display()))?;
                StoreData::from_map(values)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Store file not found, starting empty");
                StoreData::default()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("read store failed: {}", path.display()))
            }
        };

        info!(path = %path.display(), keys = data.as_map().len(), "Opened key-value store");
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(Self {
            path,
            data: Mutex::new(data),
            changes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("create store dir failed: {}", dir.display()))?;
        }
        Ok(())
    }

    async fn atomic_write(&self, data: &StoreData) -> Result<()> {
        self.ensure_parent_dir().await?;

        let content =
            serde_json::to_string_pretty(data.as_map()).context("serialize store failed")?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .await
            .with_context(|| format!("write temp store failed: {}", tmp_path.display()))?;

        fs::rename(&tmp_path, &self.path).await.with_context(|| {
            format!(
                "rename temp store to target failed: {} -> {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }

    /// Apply `mutate` to a copy, persist it, then swap it in and notify.
    async fn mutate<F>(&self, mutate: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut StoreData) -> Vec<StoreKey> + Send,
    {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        let changed = mutate(&mut next);
        if changed.is_empty() {
            return Ok(());
        }

        self.atomic_write(&next)
            .await
            .map_err(|e| StoreError::Io(format!("{e:#}")))?;

        *data = next;
        drop(data);
        publish(&self.changes, changed);
        Ok(())
    }
}

#[async_trait]
impl KeyValueStorePort for JsonFileKeyValueStore {
    async fn get(&self, key: StoreKey) -> Result<Option<Value>, StoreError> {
        Ok(self.data.lock().await.get(key))
    }

    async fn set(&self, entries: Vec<(StoreKey, Value)>) -> Result<(), StoreError> {
        self.mutate(move |data| data.set(entries)).await
    }

    async fn remove(&self, keys: &[StoreKey]) -> Result<(), StoreError> {
        let keys = keys.to_vec();
        self.mutate(move |data| data.remove(&keys)).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.mutate(StoreData::clear).await
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }
}
