//! Periodic tick driver
//!
//! Owns at most one tokio task that ticks the clock session. The task is
//! bound to the session generation it was spawned for and exits the first
//! time it sees a different one, so a tick already in flight during a turn
//! switch or pause never bills the wrong side.

use std::sync::{Arc, Weak};
use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, error, warn};

use crate::state::{AppState, Session, TickOutcome};

#[derive(Debug)]
struct RunningTask {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Starts and cancels the tick task as the session changes.
#[derive(Debug, Default)]
pub struct TickDriver {
    task: Option<RunningTask>,
}

impl TickDriver {
    pub fn new() -> Self {
        Self { task: None }
    }

    /// Bring the driver in line with `session`. Call after every transition.
    pub fn sync(&mut self, state: &Arc<AppState>, session: &Session) {
        if !session.clock.should_tick() {
            self.stop();
            return;
        }

        if let Some(task) = &self.task {
            if task.generation == session.generation && !task.handle.is_finished() {
                return;
            }
        }

        self.stop();

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!("No async runtime available, clock will not tick: {}", e);
                return;
            }
        };

        let generation = session.generation;
        let handle = runtime.spawn(tick_task(Arc::downgrade(state), generation));
        debug!("Tick driver started for generation {}", generation);
        self.task = Some(RunningTask { generation, handle });
    }

    /// Cancel the running task, if any.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.handle.abort();
            debug!("Tick driver stopped for generation {}", task.generation);
        }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .as_ref()
            .map(|task| !task.handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Tick loop for one generation of the session.
async fn tick_task(state: Weak<AppState>, generation: u64) {
    let period = match state.upgrade() {
        Some(app) => app.tick_interval,
        None => return,
    };

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; the transition already set the baseline.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let Some(app) = state.upgrade() else {
            break;
        };

        match app.apply_tick(generation) {
            Ok(TickOutcome::Continue) => {}
            Ok(TickOutcome::Stale) => {
                debug!("Tick task for generation {} is stale, exiting", generation);
                break;
            }
            Ok(TickOutcome::Finished) => {
                debug!("Clock stopped running, tick task for generation {} exiting", generation);
                break;
            }
            Err(e) => {
                error!("Failed to apply tick: {}", e);
                break;
            }
        }
    }
}
