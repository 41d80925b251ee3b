use cm_core::ports::{KeyValueStorePort, StoreKey};
use cm_infra::JsonFileKeyValueStore;
use serde_json::json;
use tempfile::TempDir;

#[tokio::test]
async fn test_values_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("store.json");

    {
        let store = JsonFileKeyValueStore::open(&path).await.unwrap();
        store
            .set(vec![
                (StoreKey::Credential, json!("sk_live_abc")),
                (StoreKey::CachedSnippets, json!([{ "id": "1", "title": "Hi" }])),
            ])
            .await
            .unwrap();
    }

    let reopened = JsonFileKeyValueStore::open(&path).await.unwrap();
    assert_eq!(
        reopened.get(StoreKey::Credential).await.unwrap(),
        Some(json!("sk_live_abc"))
    );
    assert_eq!(
        reopened.get(StoreKey::CachedSnippets).await.unwrap(),
        Some(json!([{ "id": "1", "title": "Hi" }]))
    );
    assert!(!path.with_extension("json.tmp").exists());
}

#[tokio::test]
async fn test_file_uses_extension_key_names() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    let store = JsonFileKeyValueStore::open(&path).await.unwrap();

    store
        .set(vec![
            (StoreKey::EndpointOverride, json!("http://localhost:3000")),
            (StoreKey::MenuSnippets, json!([])),
        ])
        .await
        .unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["webAppUrl"], json!("http://localhost:3000"));
    assert_eq!(raw["contextMenuSnippets"], json!([]));
}

#[tokio::test]
async fn test_unknown_keys_on_disk_are_preserved() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, r#"{"legacyFlag": true}"#).unwrap();

    let store = JsonFileKeyValueStore::open(&path).await.unwrap();
    store
        .set(vec![(StoreKey::InstallId, json!("id-1"))])
        .await
        .unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["legacyFlag"], json!(true));
    assert_eq!(raw["installId"], json!("id-1"));
}

#[tokio::test]
async fn test_corrupt_file_fails_to_open() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "not json").unwrap();

    assert!(JsonFileKeyValueStore::open(&path).await.is_err());
}

#[tokio::test]
async fn test_changes_are_broadcast_once_per_write() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileKeyValueStore::open(dir.path().join("store.json"))
        .await
        .unwrap();
    let mut rx = store.subscribe();

    store
        .set(vec![
            (StoreKey::Credential, json!("a")),
            (StoreKey::EndpointOverride, json!("http://x")),
        ])
        .await
        .unwrap();
    let change = rx.recv().await.unwrap();
    assert_eq!(change.keys, [StoreKey::Credential, StoreKey::EndpointOverride]);

    store.remove(&[StoreKey::Settings]).await.unwrap();
    store.remove(&[StoreKey::Credential]).await.unwrap();
    assert_eq!(rx.recv().await.unwrap().keys, [StoreKey::Credential]);

    store.clear().await.unwrap();
    assert_eq!(rx.recv().await.unwrap().keys, [StoreKey::EndpointOverride]);
    assert!(rx.try_recv().is_err());
}
