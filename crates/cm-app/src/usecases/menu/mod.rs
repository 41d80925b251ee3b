//! Menu Builder and its single-flight guard.

mod guard;
mod rebuild_menu;

pub use guard::{RebuildGuard, RebuildPermit};
pub use rebuild_menu::{MenuBuilder, RebuildOutcome};
