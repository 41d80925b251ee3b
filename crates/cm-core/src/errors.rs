use thiserror::Error;

use crate::ports::StoreError;

/// Failure of one Cache Synchronizer run.
///
/// None of these variants imply the cached snippet set was touched: a failed
/// fetch always leaves the previous cache in place.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("{message} (HTTP {status})")]
    Http { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SyncError {
    /// Message suitable for showing to the user in the popup.
    pub fn user_message(&self) -> String {
        match self {
            SyncError::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
