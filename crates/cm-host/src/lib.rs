//! # cm-host
//!
//! Process-level glue for the ClickMemory companion.
//!
//! ## Modules
//!
//! - **bootstrap**: config loading, tracing, dependency wiring, startup sequence
//! - **bridge**: JSON-lines protocol spoken with the host shell over stdin/stdout

pub mod bootstrap;
pub mod bridge;
