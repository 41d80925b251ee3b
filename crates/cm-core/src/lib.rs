//! # cm-core
//!
//! Core domain models and port definitions for the ClickMemory companion.
//!
//! This crate contains pure domain logic without any infrastructure dependencies.

// Public module exports
pub mod config;
pub mod credential;
pub mod endpoint;
pub mod errors;
pub mod ids;
pub mod menu;
pub mod ports;
pub mod settings;
pub mod snippet;
pub mod text;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use credential::{Credential, CredentialError};
pub use endpoint::Endpoint;
pub use errors::SyncError;
pub use ids::{InstallId, SnippetId};
pub use menu::{MenuEntry, MenuItem, MenuState, MenuTarget};
pub use settings::UserSettings;
pub use snippet::{Snippet, SnippetPage, SnippetScope, SnippetSet};
