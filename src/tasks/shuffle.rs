//! Roster shuffle background task

use std::{sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time::{interval_at, Instant}};
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Background task that periodically reorders the team roster.
///
/// The shuffle timer is cancelled and recreated on every snapshot.
pub async fn shuffle_task(state: Arc<AppState>) {
    info!("Starting roster shuffle task");

    let mut snapshot_rx = state.snapshot_tx.subscribe();
    let mut shuffler: Option<JoinHandle<()>> = None;

    loop {
        let snapshot = Arc::clone(&snapshot_rx.borrow_and_update());

        if let Some(previous) = shuffler.take() {
            previous.abort();
        }

        if snapshot.shuffle_enabled {
            let period = snapshot.shuffle_interval();
            debug!("Shuffling roster every {}s", period.as_secs());
            shuffler = Some(tokio::spawn(run_shuffle(Arc::clone(&state), period)));
        }

        if snapshot_rx.changed().await.is_err() {
            info!("Snapshot channel closed, stopping shuffle task");
            break;
        }
    }

    if let Some(previous) = shuffler.take() {
        previous.abort();
    }
}

async fn run_shuffle(state: Arc<AppState>, period: Duration) {
    // First reorder happens one full period after (re)start
    let mut interval = interval_at(Instant::now() + period, period);
    loop {
        interval.tick().await;
        if let Err(e) = state.shuffle_roster() {
            warn!("Failed to shuffle roster: {}", e);
        }
    }
}
