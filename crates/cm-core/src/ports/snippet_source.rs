use async_trait::async_trait;

use crate::credential::Credential;
use crate::endpoint::Endpoint;
use crate::errors::SyncError;
use crate::snippet::{SnippetPage, SnippetScope};

/// Remote snippet source. Treated as unreliable and possibly slow.
#[async_trait]
pub trait SnippetSourcePort: Send + Sync {
    /// Issue exactly one request for `scope` and parse the page.
    ///
    /// Transport failures map to [`SyncError::Network`], non-2xx statuses to
    /// [`SyncError::Http`] and unparsable bodies to
    /// [`SyncError::MalformedResponse`].
    async fn fetch_snippets(
        &self,
        credential: &Credential,
        endpoint: &Endpoint,
        scope: SnippetScope,
    ) -> Result<SnippetPage, SyncError>;
}
