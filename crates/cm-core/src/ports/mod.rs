//! Port interfaces for the application layer
//!
//! Ports define the contract between the use cases and the infrastructure or
//! host-shell implementations. Use cases depend only on these traits.
//!
//! | Port | Implemented by |
//! |------|----------------|
//! | [`KeyValueStorePort`] | `cm-infra` (JSON file, in-memory) |
//! | [`SnippetSourcePort`] | `cm-infra` (reqwest) |
//! | [`TelemetryPort`] | `cm-infra` (reqwest, no-op) |
//! | [`MenuSurfacePort`] | `cm-platform` |
//! | [`TextInsertionPort`] | `cm-platform` |
//! | [`UiPort`] | `cm-platform` |

mod menu_surface;
mod snippet_source;
pub mod store;
mod telemetry;
mod text_insertion;
mod ui_port;

pub use menu_surface::MenuSurfacePort;
pub use snippet_source::SnippetSourcePort;
pub use store::{KeyValueStorePort, StoreChange, StoreError, StoreKey};
pub use telemetry::{TelemetryEvent, TelemetryPort};
pub use text_insertion::TextInsertionPort;
pub use ui_port::UiPort;
