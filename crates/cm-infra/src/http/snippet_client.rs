use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::{debug, warn};
use cm_core::ports::SnippetSourcePort;
use cm_core::{Credential, Endpoint, SnippetPage, SnippetScope, SyncError};

use super::build_client;

const SNIPPETS_PATH: &str = "/api/snippets";
const FALLBACK_ERROR: &str = "Failed to fetch snippets";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// `GET {endpoint}/api/snippets` with a bearer token.
pub struct HttpSnippetSource {
    client: reqwest::Client,
}

impl HttpSnippetSource {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
        })
    }

    fn url(endpoint: &Endpoint, scope: SnippetScope) -> String {
        let url = endpoint.join(SNIPPETS_PATH);
        match scope {
            SnippetScope::All => url,
            SnippetScope::MenuEligible => format!("{url}?context_menu=true"),
        }
    }
}

/// Message carried by a non-2xx body: `{"error": ...}`, else the raw text,
/// else a fixed fallback.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed
            .error
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| FALLBACK_ERROR.to_string()),
        Err(_) if !body.trim().is_empty() => body.to_string(),
        Err(_) => FALLBACK_ERROR.to_string(),
    }
}

#[async_trait]
impl SnippetSourcePort for HttpSnippetSource {
    async fn fetch_snippets(
        &self,
        credential: &Credential,
        endpoint: &Endpoint,
        scope: SnippetScope,
    ) -> Result<SnippetPage, SyncError> {
        let url = Self::url(endpoint, scope);
        debug!(%url, ?scope, "Fetching snippets");

        let response = self
            .client
            .get(&url)
            .bearer_auth(credential.expose())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = error_message(&body);
            warn!(status = status.as_u16(), %message, "Snippet fetch rejected");
            return Err(SyncError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let page: SnippetPage = serde_json::from_str(&body)
            .map_err(|e| SyncError::MalformedResponse(e.to_string()))?;
        debug!(count = page.snippets.len(), total = page.total(), "Fetched snippets");
        Ok(page)
    }
}
