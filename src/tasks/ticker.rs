//! Countdown tick background task

use std::{sync::Arc, time::Duration};
use chrono::Utc;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, error, info};

use crate::state::{
    timer_state, AppState, ConfigSnapshot, Effect, TimerPhase,
};

/// The one repeating tick of a running countdown.
///
/// Dropping the handle cancels the tick.
#[derive(Debug)]
pub struct TickHandle {
    task: JoinHandle<()>,
}

impl TickHandle {
    /// Start ticking once per second for `snapshot`
    pub fn spawn(state: Arc<AppState>, snapshot: Arc<ConfigSnapshot>) -> Self {
        Self {
            task: tokio::spawn(run_tick(state, snapshot)),
        }
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.task.abort_handle()
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Background task that re-derives the countdown whenever a snapshot arrives
pub async fn timer_tick_task(state: Arc<AppState>) {
    info!("Starting timer tick task");

    let mut snapshot_rx = state.snapshot_tx.subscribe();
    let mut tick: Option<TickHandle> = None;

    loop {
        let snapshot = Arc::clone(&snapshot_rx.borrow_and_update());

        // Cancel the previous tick before anything else can render
        if tick.take().is_some() {
            debug!("Previous tick cancelled");
        }
        tick = start_tick(&state, snapshot);

        // Wait for the next snapshot
        if snapshot_rx.changed().await.is_err() {
            info!("Snapshot channel closed, stopping timer tick task");
            break;
        }
    }
}

/// Render a static timer once, or start a tick for a running one
fn start_tick(state: &Arc<AppState>, snapshot: Arc<ConfigSnapshot>) -> Option<TickHandle> {
    if snapshot.timer_state == TimerPhase::Running && snapshot.timer_ends_at.is_some() {
        debug!("Timer running until {:?}, starting tick", snapshot.timer_ends_at);
        return Some(TickHandle::spawn(Arc::clone(state), snapshot));
    }

    let view = timer_state::render(&snapshot, Utc::now());
    debug!("Timer {} at {}", snapshot.timer_state, view.text);
    if let Err(e) = state.set_timer_view(&snapshot, view) {
        error!("Failed to update timer view: {}", e);
    }
    None
}

async fn run_tick(state: Arc<AppState>, snapshot: Arc<ConfigSnapshot>) {
    let mut interval = tokio::time::interval(Duration::from_secs(1));

    loop {
        interval.tick().await;

        let view = timer_state::render(&snapshot, Utc::now());
        let expired = view.is_expired();

        match state.set_timer_view(&snapshot, view) {
            Ok(true) => {}
            Ok(false) => {
                debug!("Snapshot replaced, stale tick exiting");
                break;
            }
            Err(e) => {
                error!("Failed to update timer view: {}", e);
            }
        }

        if expired {
            // Hold at 00:00:00; the alarm rings once per end time
            if let Some(ends_at) = snapshot.timer_ends_at {
                if state.claim_expiry(ends_at) {
                    info!("Countdown ending at {} expired", ends_at);
                    state.emit(Effect::TimerExpired);
                }
            }
            break;
        }
    }
}
