//! Single-flight guard for menu rebuilds.
//! 菜单重建的单飞守卫

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

const IDLE: u8 = 0;
const BUILDING: u8 = 1;

/// Two-state flag: `Idle` or `Building`.
///
/// Acquisition is one compare-and-set and must happen before the first
/// `.await` of a rebuild. A held guard rejects, it never queues.
#[derive(Debug, Default, Clone)]
pub struct RebuildGuard {
    state: Arc<AtomicU8>,
}

impl RebuildGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to move `Idle -> Building`. `None` if a rebuild is already running.
    pub fn try_acquire(&self) -> Option<RebuildPermit> {
        self.state
            .compare_exchange(IDLE, BUILDING, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RebuildPermit {
                state: Arc::clone(&self.state),
            })
    }

    pub fn is_building(&self) -> bool {
        self.state.load(Ordering::Acquire) == BUILDING
    }
}

/// Held for the duration of one rebuild. Dropping it returns the guard to `Idle`.
#[derive(Debug)]
pub struct RebuildPermit {
    state: Arc<AtomicU8>,
}

impl Drop for RebuildPermit {
    fn drop(&mut self) {
        self.state.store(IDLE, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_rejected_while_held() {
        let guard = RebuildGuard::new();

        let permit = guard.try_acquire();
        assert!(permit.is_some());
        assert!(guard.is_building());
        assert!(guard.try_acquire().is_none());

        drop(permit);
        assert!(!guard.is_building());
        assert!(guard.try_acquire().is_some());
    }

    #[test]
    fn test_permit_released_on_panic_unwind() {
        let guard = RebuildGuard::new();
        let cloned = guard.clone();

        let result = std::panic::catch_unwind(move || {
            let _permit = cloned.try_acquire().expect("idle guard");
            panic!("rebuild blew up");
        });

        assert!(result.is_err());
        assert!(!guard.is_building());
    }
}
