//! Periodic background reload of a `SyncEngine`.

use crate::engine::{Shared, SyncEngine};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};

const MIN_RELOAD_INTERVAL: Duration = Duration::from_millis(1);

/// Handle of a running reload loop.
pub(crate) struct ReloadTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl ReloadTask {
    fn spawn(shared: Arc<Shared>, period: Duration) -> Self {
        let (shutdown, mut rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    changed = rx.changed() => {
                        if changed.is_err() || *rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        shared.tick().await;
                    }
                }
            }
            info!(namespace = %shared.namespace, "Auto-reload stopped");
        });

        Self { shutdown, handle }
    }

    /// Signals the loop and waits for a tick in progress to finish.
    async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Auto-reload task did not shut down cleanly");
        }
    }
}

impl SyncEngine {
    /// Starts reloading from the remote store every `reload_interval`. The
    /// first reload happens one full period after the call. A loop that is
    /// already running is stopped and replaced.
    pub async fn start_auto_reload(&self) {
        let period = *self.reload_interval.lock();
        let task = ReloadTask::spawn(Arc::clone(&self.shared), period);

        let previous = self.reload_task.lock().replace(task);
        if let Some(previous) = previous {
            previous.stop().await;
        }

        info!(
            namespace = %self.shared.namespace,
            interval_ms = period.as_millis() as u64,
            "Auto-reload started"
        );
    }

    /// Stops the reload loop. Returns `false` if none was running.
    ///
    /// Once this returns no reload is running and none will start.
    pub async fn stop_auto_reload(&self) -> bool {
        let task = self.reload_task.lock().take();
        match task {
            Some(task) => {
                task.stop().await;
                true
            }
            None => false,
        }
    }

    pub fn is_auto_reloading(&self) -> bool {
        self.reload_task
            .lock()
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }

    /// Period used by the next `start_auto_reload`. A running loop keeps its
    /// period until restarted.
    pub fn set_reload_interval(&self, interval: Duration) {
        *self.reload_interval.lock() = interval.max(MIN_RELOAD_INTERVAL);
    }

    pub fn reload_interval(&self) -> Duration {
        *self.reload_interval.lock()
    }
}

impl Drop for SyncEngine {
    fn drop(&mut self) {
        if let Some(task) = self.reload_task.get_mut().take() {
            let _ = task.shutdown.send(true);
            task.handle.abort();
        }
    }
}
