//! ClickMemory Application Orchestration Layer
//!
//! Use cases and trigger sources for the snippet cache and the quick-insert
//! menu. Depends only on `cm-core` ports.

pub mod app;
pub mod deps;
pub mod state;
pub mod telemetry;
pub mod triggers;
pub mod usecases;

pub use app::App;
pub use deps::AppDeps;
pub use state::ExtensionState;
pub use telemetry::Tracker;
