//! Background task driving session metering.
//!
//! The ticker only has to call `SessionService::tick_all` at least once per
//! second. Charging is computed from elapsed time, so a late or skipped tick
//! is made up on the next one.
//!
//! A tick locks the state and writes through to storage, which may be a
//! disk. It therefore runs on the blocking pool, never on a runtime worker.

use log::{debug, error, info};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::session_service::SessionService;

/// Longest period that still ticks once per second
pub const MAX_TICK_PERIOD: Duration = Duration::from_secs(1);

pub struct SessionTicker {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SessionTicker {
    /// Spawn the ticker on the current tokio runtime. Periods above one
    /// second are capped.
    pub fn spawn(sessions: SessionService, period: Duration) -> Self {
        let period = period.clamp(Duration::from_millis(1), MAX_TICK_PERIOD);
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        info!("Starting session ticker every {:?}", period);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => {
                        let tick_sessions = sessions.clone();
                        match tokio::task::spawn_blocking(move || tick_sessions.tick_all()).await {
                            Ok(Ok(outcomes)) => {
                                for outcome in outcomes {
                                    debug!(
                                        "Tick for {}: {} debit(s), stopped: {:?}",
                                        outcome.child_id,
                                        outcome.debits.len(),
                                        outcome.stopped
                                    );
                                }
                            }
                            Ok(Err(e)) => error!("Session tick failed: {}", e),
                            Err(e) => error!("Session tick task panicked: {}", e),
                        }
                    }
                }
            }
            info!("Session ticker stopped");
        });

        Self { shutdown_tx, handle }
    }

    /// Stop ticking and wait for the task to finish
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.handle.await {
            error!("Session ticker task failed: {}", e);
        }
    }
}
