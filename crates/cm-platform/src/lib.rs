//! # cm-platform
//!
//! Host-facing implementations for the ClickMemory companion.
//!
//! The host shell renders the menu, inserts text and opens URLs. This crate
//! turns those capabilities into ports backed by an outbound event channel,
//! and runs the loop that dispatches inbound control messages to use cases.

pub mod adapters;
pub mod ipc;
pub mod runtime;
