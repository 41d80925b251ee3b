//! Key-value stores backing the extension state.
//! 键值存储

mod file_store;
mod memory_store;

pub use file_store::JsonFileKeyValueStore;
pub use memory_store::InMemoryKeyValueStore;

use serde_json::{Map, Value};
use tokio::sync::broadcast;
use tracing::trace;
use cm_core::ports::{StoreChange, StoreKey};

/// Buffered change notifications per subscriber before it lags.
pub(crate) const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// The store contents. Unknown keys read from disk are kept as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct StoreData {
    values: Map<String, Value>,
}

impl StoreData {
    pub(crate) fn from_map(values: Map<String, Value>) -> Self {
        Self { values }
    }

    pub(crate) fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub(crate) fn get(&self, key: StoreKey) -> Option<Value> {
        self.values.get(key.as_str()).cloned()
    }

    /// Returns the keys whose value actually changed.
    pub(crate) fn set(&mut self, entries: Vec<(StoreKey, Value)>) -> Vec<StoreKey> {
        let mut changed = Vec::new();
        for (key, value) in entries {
            let previous = self.values.insert(key.as_str().to_string(), value.clone());
            if previous.as_ref() != Some(&value) && !changed.contains(&key) {
                changed.push(key);
            }
        }
        changed
    }

    pub(crate) fn remove(&mut self, keys: &[StoreKey]) -> Vec<StoreKey> {
        keys.iter()
            .copied()
            .filter(|key| self.values.remove(key.as_str()).is_some())
            .collect()
    }

    pub(crate) fn clear(&mut self) -> Vec<StoreKey> {
        let changed = StoreKey::ALL
            .into_iter()
            .filter(|key| self.values.contains_key(key.as_str()))
            .collect();
        self.values.clear();
        changed
    }
}

/// Broadcast a change if any key changed. No subscribers is not an error.
pub(crate) fn publish(tx: &broadcast::Sender<StoreChange>, keys: Vec<StoreKey>) {
    if keys.is_empty() {
        return;
    }
    trace!(?keys, "Store changed");
    let _ = tx.send(StoreChange { keys });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_reports_only_changed_keys() {
        let mut data = StoreData::default();

        let changed = data.set(vec![
            (StoreKey::Credential, json!("a")),
            (StoreKey::Settings, json!({})),
        ]);
        assert_eq!(changed, [StoreKey::Credential, StoreKey::Settings]);

        let changed = data.set(vec![
            (StoreKey::Credential, json!("a")),
            (StoreKey::Settings, json!({ "showSnippetPreview": false })),
        ]);
        assert_eq!(changed, [StoreKey::Settings]);
    }

    #[test]
    fn test_remove_and_clear_report_present_keys() {
        let mut data = StoreData::default();
        data.set(vec![(StoreKey::Credential, json!("a"))]);

        assert_eq!(
            data.remove(&[StoreKey::Credential, StoreKey::InstallId]),
            [StoreKey::Credential]
        );

        data.set(vec![(StoreKey::InstallId, json!("id"))]);
        assert_eq!(data.clear(), [StoreKey::InstallId]);
        assert!(data.clear().is_empty());
    }
}
