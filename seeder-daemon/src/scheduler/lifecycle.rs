//! Reconciliation scheduler
//!
//! Runs a reconciliation cycle on start and then on every tick of a fixed
//! interval until cancelled. Cancellation is observed between cycles; a cycle
//! already in flight is allowed to finish, and the caller bounds that wait
//! with a grace period by watching for [`SchedulerState::Stopped`].

use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::service::Reconciler;

/// Lifecycle of the scheduler loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Waiting for the next tick
    Idle,
    /// A cycle is in flight
    Running,
    /// Cancelled; finishing the in-flight cycle
    ShuttingDown,
    /// Loop exited, no more cycles will run
    Stopped,
}

/// Drives the [`Reconciler`] on a fixed interval
pub struct Scheduler {
    reconciler: Reconciler,
    interval: Duration,
    state: watch::Sender<SchedulerState>,
}

impl Scheduler {
    /// Creates a new scheduler
    pub fn new(reconciler: Reconciler, interval: Duration) -> Self {
        let (state, _) = watch::channel(SchedulerState::Idle);
        Self {
            reconciler,
            interval,
            state,
        }
    }

    /// Subscribes to state transitions
    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.state.subscribe()
    }

    /// Runs cycles until `cancel` fires
    ///
    /// Errors inside a cycle never end the loop; only cancellation does.
    pub async fn run(self, cancel: CancellationToken) {
        info!(interval = ?self.interval, "Starting reconciliation scheduler");

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    self.state.send_replace(SchedulerState::ShuttingDown);
                    info!("shutting down scheduler");
                    break;
                }
                _ = ticker.tick() => {}
            }

            self.state.send_replace(SchedulerState::Running);

            let cycle = self.reconciler.run_cycle();
            tokio::pin!(cycle);

            tokio::select! {
                _ = &mut cycle => {}
                _ = cancel.cancelled() => {
                    self.state.send_replace(SchedulerState::ShuttingDown);
                    info!("shutdown requested; waiting for in-flight cycle");
                    cycle.await;
                    break;
                }
            }

            self.state.send_replace(SchedulerState::Idle);
            debug!("ticker still ticking");
        }

        self.state.send_replace(SchedulerState::Stopped);
        info!("scheduler stopped");
    }
}

/// Waits up to `grace` for the scheduler to reach [`SchedulerState::Stopped`]
///
/// Returns `false` when the grace period ran out first.
pub async fn wait_for_stop(mut state: watch::Receiver<SchedulerState>, grace: Duration) -> bool {
    let stopped = time::timeout(grace, state.wait_for(|s| *s == SchedulerState::Stopped)).await;
    stopped.is_ok()
}
