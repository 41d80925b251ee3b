use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Machine-readable outcome carried in every bridge response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlStatus {
    Ok,
    RebuildInProgress,
    NoCredential,
    InvalidCredential,
    NotFound,
    Failed,
}

/// Why a control message did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("Context menu creation already in progress")]
    RebuildInProgress,

    #[error("No API key configured")]
    NoCredential,

    #[error("{0}")]
    InvalidCredential(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Failed(String),
}

impl ControlError {
    pub fn status(&self) -> ControlStatus {
        match self {
            ControlError::RebuildInProgress => ControlStatus::RebuildInProgress,
            ControlError::NoCredential => ControlStatus::NoCredential,
            ControlError::InvalidCredential(_) => ControlStatus::InvalidCredential,
            ControlError::NotFound(_) => ControlStatus::NotFound,
            ControlError::Failed(_) => ControlStatus::Failed,
        }
    }

    pub fn failed(err: impl std::fmt::Display) -> Self {
        ControlError::Failed(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlResponse {
    pub success: bool,
    pub status: ControlStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ControlResponse {
    pub fn ok(data: Option<Value>) -> Self {
        Self {
            success: true,
            status: ControlStatus::Ok,
            error: None,
            data,
        }
    }

    pub fn failure(error: ControlError) -> Self {
        Self {
            success: false,
            status: error.status(),
            error: Some(error.to_string()),
            data: None,
        }
    }
}

impl From<Result<Option<Value>, ControlError>> for ControlResponse {
    fn from(result: Result<Option<Value>, ControlError>) -> Self {
        match result {
            Ok(data) => ControlResponse::ok(data),
            Err(e) => ControlResponse::failure(e),
        }
    }
}
