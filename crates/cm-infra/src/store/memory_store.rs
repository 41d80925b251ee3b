use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{broadcast, Mutex};
use cm_core::ports::{KeyValueStorePort, StoreChange, StoreError, StoreKey};

use super::{publish, StoreData, CHANGE_CHANNEL_CAPACITY};

/// Volatile store for tests and `--store :memory:` runs.
pub struct InMemoryKeyValueStore {
    data: Mutex<StoreData>,
    changes: broadcast::Sender<StoreChange>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            data: Mutex::new(StoreData::default()),
            changes,
        }
    }
}

impl Default for InMemoryKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStorePort for InMemoryKeyValueStore {
    async fn get(&self, key: StoreKey) -> Result<Option<Value>, StoreError> {
        Ok(self.data.lock().await.get(key))
    }

    async fn set(&self, entries: Vec<(StoreKey, Value)>) -> Result<(), StoreError> {
        let changed = self.data.lock().await.set(entries);
        publish(&self.changes, changed);
        Ok(())
    }

    async fn remove(&self, keys: &[StoreKey]) -> Result<(), StoreError> {
        let changed = self.data.lock().await.remove(keys);
        publish(&self.changes, changed);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let changed = self.data.lock().await.clear();
        publish(&self.changes, changed);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }
}
