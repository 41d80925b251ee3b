use anyhow::Result;

#[async_trait::async_trait]
pub trait UiPort: Send + Sync {
    /// Open the web app's configuration surface (setup page, dashboard) at `url`.
    async fn open_configuration(&self, url: &str) -> Result<()>;
}
