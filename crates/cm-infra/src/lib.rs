//! Infrastructure adapters for the ClickMemory companion.
//!
//! - [`store`]: key-value stores with change notification
//! - [`http`]: reqwest clients for the snippet API and telemetry

pub mod http;
pub mod store;

pub use http::{HttpSnippetSource, HttpTelemetry, NoopTelemetry};
pub use store::{InMemoryKeyValueStore, JsonFileKeyValueStore};
