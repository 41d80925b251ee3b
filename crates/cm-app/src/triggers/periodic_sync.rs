//! Periodic background sync.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::usecases::menu::{MenuBuilder, RebuildOutcome};
use crate::usecases::sync_snippets::{SyncOutcome, SyncSnippets};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No credential; nothing fetched, menu untouched.
    NoCredential,
    /// Fetch failed; cache and menu untouched until the next tick.
    SyncFailed,
    Rebuilt(RebuildOutcome),
}

struct Cycle {
    sync: Arc<SyncSnippets>,
    builder: Arc<MenuBuilder>,
}

impl Cycle {
    async fn run(&self) -> TickOutcome {
        match self.sync.execute().await {
            Ok(SyncOutcome::NoCredential) => TickOutcome::NoCredential,
            Ok(SyncOutcome::Synced(_)) => TickOutcome::Rebuilt(self.builder.rebuild_menu().await),
            Err(e) => {
                warn!(error = %e, "Periodic sync failed, will retry on next tick");
                TickOutcome::SyncFailed
            }
        }
    }
}

/// Re-syncs the cache and rebuilds the menu every `period`.
///
/// The first tick fires one full period after [`start`](Self::start). At most
/// one timer exists; starting again replaces it.
pub struct PeriodicSync {
    cycle: Arc<Cycle>,
    period: Duration,
    handle: Mutex<Option<AbortHandle>>,
}

impl PeriodicSync {
    pub fn new(sync: Arc<SyncSnippets>, builder: Arc<MenuBuilder>, period: Duration) -> Self {
        Self {
            cycle: Arc::new(Cycle { sync, builder }),
            period,
            handle: Mutex::new(None),
        }
    }

    pub async fn start(&self) {
        let mut guard = self.handle.lock().await;
        if let Some(existing) = guard.take() {
            existing.abort();
            debug!("Replaced running periodic sync timer");
        }

        let cycle = Arc::clone(&self.cycle);
        let period = self.period;
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let outcome = cycle.run().await;
                debug!(?outcome, "Periodic sync tick");
            }
        });

        *guard = Some(handle.abort_handle());
        info!(period_secs = period.as_secs(), "Periodic sync started");
    }

    pub async fn stop(&self) {
        if let Some(handle) = self.handle.lock().await.take() {
            handle.abort();
            info!("Periodic sync stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.handle
            .lock()
            .await
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Run one cycle now, outside the timer.
    pub async fn tick(&self) -> TickOutcome {
        self.cycle.run().await
    }
}
