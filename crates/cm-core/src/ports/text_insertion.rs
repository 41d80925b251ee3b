use async_trait::async_trait;

/// Inserts text into whatever editable surface currently has focus.
#[async_trait]
pub trait TextInsertionPort: Send + Sync {
    async fn insert_text(&self, text: &str) -> anyhow::Result<()>;
}
