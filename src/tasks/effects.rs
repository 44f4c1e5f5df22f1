//! Effect playback background task

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::{services::EffectPlayer, state::AppState};

/// Background task that plays every effect emitted by the display.
///
/// Playback failures are logged and never retried.
pub async fn effect_task(state: Arc<AppState>, player: EffectPlayer) {
    info!("Starting effect task");

    let mut effect_rx = state.effect_tx.subscribe();
    let player = Arc::new(player);

    loop {
        match effect_rx.recv().await {
            Ok(effect) => {
                let player = Arc::clone(&player);
                // Long sounds must not delay the next effect
                tokio::spawn(async move {
                    if let Err(e) = player.play(&effect).await {
                        warn!("Effect playback failed: {}", e);
                    }
                });
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Effect task lagged, {} effects dropped", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Effect channel closed, stopping effect task");
                break;
            }
        }
    }
}
