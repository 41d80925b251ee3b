//! Trigger sources that feed the Cache Synchronizer and the Menu Builder.
//! 触发源

mod periodic_sync;
mod storage_change;

pub use periodic_sync::{PeriodicSync, TickOutcome};
pub use storage_change::{StorageChangeDebouncer, WATCHED_KEYS};
