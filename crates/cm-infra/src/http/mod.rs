//! reqwest adapters for the snippet web app.

mod snippet_client;
mod telemetry;

pub use snippet_client::HttpSnippetSource;
pub use telemetry::{HttpTelemetry, NoopTelemetry};

use std::time::Duration;

use anyhow::{Context, Result};

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("ClickMemoryCompanion/", env!("CARGO_PKG_VERSION"));

/// Build the shared client. `None` keeps reqwest's default timeout.
pub(crate) fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().context("build http client failed")
}
