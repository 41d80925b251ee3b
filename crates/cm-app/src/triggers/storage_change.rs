//! Debounced rebuild on credential / endpoint changes.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, Mutex};
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};
use cm_core::ports::{StoreChange, StoreKey};

use crate::usecases::menu::MenuBuilder;

/// Keys whose change invalidates the rendered menu.
pub const WATCHED_KEYS: [StoreKey; 2] = [StoreKey::Credential, StoreKey::EndpointOverride];

/// Coalesces bursts of store changes into one rebuild after `delay`.
///
/// A new change cancels the pending timer. Once the timer fires the rebuild
/// runs as its own task and is never cancelled.
pub struct StorageChangeDebouncer {
    builder: Arc<MenuBuilder>,
    delay: Duration,
    pending: Mutex<Option<AbortHandle>>,
}

impl StorageChangeDebouncer {
    pub fn new(builder: Arc<MenuBuilder>, delay: Duration) -> Self {
        Self {
            builder,
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Schedule a rebuild if `change` touches a watched key.
    pub async fn notify(&self, change: &StoreChange) -> bool {
        if !change.touches_any(&WATCHED_KEYS) {
            return false;
        }
        self.schedule().await;
        true
    }

    /// Cancel any pending rebuild and start a fresh delay.
    pub async fn schedule(&self) {
        let mut pending = self.pending.lock().await;
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let builder = Arc::clone(&self.builder);
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            sleep(delay).await;
            // Detached so a later abort of this timer cannot cut a rebuild short.
            tokio::spawn(async move {
                let outcome = builder.rebuild_menu().await;
                debug!(?outcome, "Debounced menu rebuild finished");
            });
        });

        *pending = Some(handle.abort_handle());
        debug!(delay_ms = delay.as_millis() as u64, "Menu rebuild scheduled");
    }

    /// Listen on the store's change bus until it closes.
    pub fn spawn_listener(
        self: Arc<Self>,
        mut changes: broadcast::Receiver<StoreChange>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!("Storage change listener started");
            loop {
                match changes.recv().await {
                    Ok(change) => {
                        self.notify(&change).await;
                    }
                    Err(RecvError::Lagged(missed)) => {
                        warn!(missed, "Storage change listener lagged, scheduling rebuild");
                        self.schedule().await;
                    }
                    Err(RecvError::Closed) => {
                        info!("Storage change bus closed, listener exiting");
                        break;
                    }
                }
            }
        })
    }
}
