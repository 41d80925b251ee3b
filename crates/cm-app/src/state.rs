//! Typed view over the persistent key-value store.
//! 持久化键值存储的类型化视图

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use cm_core::ports::{KeyValueStorePort, StoreChange, StoreError, StoreKey};
use cm_core::{Credential, Endpoint, InstallId, SnippetSet, UserSettings};

/// Typed accessors for every persisted key.
///
/// The only place that knows how each key is encoded. Use cases never touch
/// raw JSON values.
pub struct ExtensionState {
    store: Arc<dyn KeyValueStorePort>,
    default_endpoint: Endpoint,
}

impl ExtensionState {
    pub fn new(store: Arc<dyn KeyValueStorePort>, default_endpoint: Endpoint) -> Self {
        Self {
            store,
            default_endpoint,
        }
    }

    pub fn default_endpoint(&self) -> &Endpoint {
        &self.default_endpoint
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.store.subscribe()
    }

    async fn get_json<T: DeserializeOwned>(&self, key: StoreKey) -> Result<Option<T>, StoreError> {
        match self.store.get(key).await? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| StoreError::Serialization(format!("{key}: {e}"))),
        }
    }

    fn to_value<T: Serialize>(key: StoreKey, value: &T) -> Result<Value, StoreError> {
        serde_json::to_value(value).map_err(|e| StoreError::Serialization(format!("{key}: {e}")))
    }

    async fn set_json<T: Serialize>(&self, key: StoreKey, value: &T) -> Result<(), StoreError> {
        let value = Self::to_value(key, value)?;
        self.store.set(vec![(key, value)]).await
    }

    // ---------------------------------------------------------------
    // Credential
    // ---------------------------------------------------------------

    /// The stored credential. An empty string counts as absent.
    pub async fn credential(&self) -> Result<Option<Credential>, StoreError> {
        Ok(self
            .get_json::<String>(StoreKey::Credential)
            .await?
            .filter(|s| !s.trim().is_empty())
            .map(Credential::new))
    }

    pub async fn has_credential(&self) -> Result<bool, StoreError> {
        Ok(self.credential().await?.is_some())
    }

    pub async fn set_credential(&self, credential: &Credential) -> Result<(), StoreError> {
        self.set_json(StoreKey::Credential, &credential.expose()).await
    }

    // ---------------------------------------------------------------
    // Endpoint
    // ---------------------------------------------------------------

    pub async fn endpoint_override(&self) -> Result<Option<Endpoint>, StoreError> {
        Ok(self
            .get_json::<String>(StoreKey::EndpointOverride)
            .await?
            .filter(|s| !s.trim().is_empty())
            .map(Endpoint::new))
    }

    /// The override when present, otherwise the configured default.
    pub async fn endpoint(&self) -> Result<Endpoint, StoreError> {
        Ok(self
            .endpoint_override()
            .await?
            .unwrap_or_else(|| self.default_endpoint.clone()))
    }

    // ---------------------------------------------------------------
    // Snippet caches
    // ---------------------------------------------------------------

    pub async fn cached_snippets(&self) -> Result<SnippetSet, StoreError> {
        Ok(self
            .get_json(StoreKey::CachedSnippets)
            .await?
            .unwrap_or_default())
    }

    /// Overwrite the cached set wholesale.
    pub async fn replace_cached_snippets(&self, snippets: &SnippetSet) -> Result<(), StoreError> {
        self.set_json(StoreKey::CachedSnippets, snippets).await
    }

    /// Snippets the menu was last built from.
    pub async fn menu_snippets(&self) -> Result<SnippetSet, StoreError> {
        Ok(self
            .get_json(StoreKey::MenuSnippets)
            .await?
            .unwrap_or_default())
    }

    pub async fn replace_menu_snippets(&self, snippets: &SnippetSet) -> Result<(), StoreError> {
        self.set_json(StoreKey::MenuSnippets, snippets).await
    }

    // ---------------------------------------------------------------
    // Settings
    // ---------------------------------------------------------------

    pub async fn settings(&self) -> Result<UserSettings, StoreError> {
        Ok(self.get_json(StoreKey::Settings).await?.unwrap_or_default())
    }

    pub async fn has_settings(&self) -> Result<bool, StoreError> {
        Ok(self.store.get(StoreKey::Settings).await?.is_some())
    }

    /// Save settings and endpoint override in one write.
    ///
    /// `None` removes the override so the default endpoint applies again.
    pub async fn save_settings(
        &self,
        settings: &UserSettings,
        endpoint_override: Option<&Endpoint>,
    ) -> Result<(), StoreError> {
        let mut entries = vec![(StoreKey::Settings, Self::to_value(StoreKey::Settings, settings)?)];
        match endpoint_override {
            Some(endpoint) => entries.push((
                StoreKey::EndpointOverride,
                Value::String(endpoint.as_str().to_string()),
            )),
            None => self.store.remove(&[StoreKey::EndpointOverride]).await?,
        }
        self.store.set(entries).await
    }

    /// Write first-run defaults for every key that is missing.
    ///
    /// Returns the keys that were written.
    pub async fn write_missing_defaults(&self) -> Result<Vec<StoreKey>, StoreError> {
        let mut entries = Vec::new();

        if self.store.get(StoreKey::EndpointOverride).await?.is_none() {
            entries.push((
                StoreKey::EndpointOverride,
                Value::String(self.default_endpoint.as_str().to_string()),
            ));
        }
        if self.store.get(StoreKey::Settings).await?.is_none() {
            entries.push((
                StoreKey::Settings,
                Self::to_value(StoreKey::Settings, &UserSettings::default())?,
            ));
        }
        if self.store.get(StoreKey::InstallId).await?.is_none() {
            entries.push((
                StoreKey::InstallId,
                Value::String(InstallId::new().into_inner()),
            ));
        }

        let written: Vec<StoreKey> = entries.iter().map(|(k, _)| *k).collect();
        if !entries.is_empty() {
            self.store.set(entries).await?;
        }
        Ok(written)
    }

    pub async fn install_id(&self) -> Result<Option<InstallId>, StoreError> {
        self.get_json(StoreKey::InstallId).await
    }

    /// Remove every persisted key (disconnect / reset).
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.clear().await
    }
}
