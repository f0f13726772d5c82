use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::composer::Composer;
use super::store::DraftStore;

/// Seconds between autosave ticks.
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Periodic draft writer owned by a composition view.
///
/// The task is aborted when the handle is stopped or dropped, so a view
/// that has been torn down never writes again.
pub struct Autosave {
    handle: JoinHandle<()>,
}

impl Autosave {
    pub fn spawn<S>(composer: Arc<Mutex<Composer<S>>>, interval: Duration) -> Self
    where
        S: DraftStore + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; edits already save.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let mut guard = composer.lock().await;
                match guard.tick() {
                    Ok(true) => debug!("Autosaved draft"),
                    Ok(false) => {}
                    Err(e) => warn!(error = %e, "Autosave failed"),
                }
            }
        });

        Self { handle }
    }

    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Autosave {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
