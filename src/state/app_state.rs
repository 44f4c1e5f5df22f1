//! Shared state of the display agent

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch, Notify};
use tracing::{debug, info, warn};

use super::{
    display_state::{DisplayState, DisplayView},
    layout::Layout,
    snapshot::{Action, ConfigSnapshot},
    teams::Team,
    timer_state::TimerView,
};

/// Side effects requested by the display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// One-shot action pushed by an administrator
    Action(Action),
    /// A running countdown reached zero
    TimerExpired,
}

/// Main application state of the display agent
#[derive(Debug)]
pub struct AppState {
    /// Snapshot reducer and derived view
    pub display: Arc<Mutex<DisplayState>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last snapshot delivery tracking
    pub last_update_source: Arc<Mutex<Option<String>>>,
    pub last_update_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// End time whose expiry alarm has already been played
    expired_alarm: Mutex<Option<DateTime<Utc>>>,
    /// Latest snapshot for the tick and shuffle tasks
    pub snapshot_tx: watch::Sender<Arc<ConfigSnapshot>>,
    /// Keep the receiver alive to prevent channel closure
    pub _snapshot_rx: watch::Receiver<Arc<ConfigSnapshot>>,
    /// Channel for one-shot side effects
    pub effect_tx: broadcast::Sender<Effect>,
    /// Wakes the sync task for an immediate refetch
    refresh: Notify,
}

impl AppState {
    /// Create a new AppState with the stage laid out by `initial_layout`
    pub fn new(port: u16, host: String, initial_layout: &Layout) -> Self {
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(ConfigSnapshot::default()));
        let (effect_tx, _) = broadcast::channel(100);

        Self {
            display: Arc::new(Mutex::new(DisplayState::new(initial_layout))),
            start_time: Instant::now(),
            port,
            host,
            last_update_source: Arc::new(Mutex::new(None)),
            last_update_time: Arc::new(Mutex::new(None)),
            expired_alarm: Mutex::new(None),
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
            effect_tx,
            refresh: Notify::new(),
        }
    }

    /// Replace the snapshot and notify the tick, shuffle and effect listeners
    pub fn apply_snapshot(&self, source: &str, snapshot: ConfigSnapshot) -> Result<(), String> {
        let mut display = self.display.lock()
            .map_err(|e| format!("Failed to lock display state: {}", e))?;

        let action = display.apply_snapshot(snapshot, Utc::now());
        let current = display.snapshot();

        // Publish under the display lock; watchers and the display must hold
        // the same snapshot
        self.snapshot_tx.send_replace(Arc::clone(&current));
        drop(display);

        debug!("Snapshot from {}: timer={} counter={}",
               source, current.timer_state, current.action_counter);

        if let Ok(mut last_source) = self.last_update_source.lock() {
            *last_source = Some(source.to_string());
        }
        if let Ok(mut last_time) = self.last_update_time.lock() {
            *last_time = Some(Utc::now());
        }

        if let Some(action) = action {
            info!("New action received: {:?}", action);
            self.emit(Effect::Action(action));
        }

        Ok(())
    }

    /// Replace the team list; an identical list keeps the shuffled order
    pub fn set_teams(&self, teams: Vec<Team>) -> Result<(), String> {
        let mut display = self.display.lock()
            .map_err(|e| format!("Failed to lock display state: {}", e))?;

        if display.teams() == teams.as_slice() {
            return Ok(());
        }
        debug!("Team list updated: {} teams", teams.len());
        display.set_teams(teams);
        Ok(())
    }

    /// Randomly reorder the visible roster
    pub fn shuffle_roster(&self) -> Result<(), String> {
        let mut display = self.display.lock()
            .map_err(|e| format!("Failed to lock display state: {}", e))?;

        display.shuffle_roster();
        Ok(())
    }

    /// Store a timer view rendered from `snapshot`.
    ///
    /// Returns `false` without storing anything if `snapshot` has already
    /// been replaced, so a tick that outlives its snapshot cannot overwrite
    /// the fresh view.
    pub fn set_timer_view(&self, snapshot: &Arc<ConfigSnapshot>, view: TimerView) -> Result<bool, String> {
        let mut display = self.display.lock()
            .map_err(|e| format!("Failed to lock display state: {}", e))?;

        Ok(display.set_timer_view_for(snapshot, view))
    }

    /// Get the current display view
    pub fn get_view(&self) -> Result<DisplayView, String> {
        self.display.lock()
            .map(|display| display.view())
            .map_err(|e| format!("Failed to lock display state: {}", e))
    }

    /// Get the current snapshot
    pub fn get_snapshot(&self) -> Arc<ConfigSnapshot> {
        Arc::clone(&self.snapshot_tx.borrow())
    }

    /// Get the last acknowledged action counter
    pub fn get_action_counter(&self) -> Result<Option<u64>, String> {
        self.display.lock()
            .map(|display| display.last_action_counter())
            .map_err(|e| format!("Failed to lock display state: {}", e))
    }

    /// Claim the expiry alarm for `ends_at`.
    ///
    /// Returns `true` only the first time a given end time is claimed, so a
    /// recreated tick does not ring again for the same countdown.
    pub fn claim_expiry(&self, ends_at: DateTime<Utc>) -> bool {
        match self.expired_alarm.lock() {
            Ok(mut claimed) if *claimed != Some(ends_at) => {
                *claimed = Some(ends_at);
                true
            }
            Ok(_) => false,
            Err(e) => {
                warn!("Failed to lock expiry alarm: {}", e);
                false
            }
        }
    }

    /// Send a side effect to the effect task
    pub fn emit(&self, effect: Effect) {
        if let Err(e) = self.effect_tx.send(effect) {
            warn!("No listener for effect: {}", e);
        }
    }

    /// Ask the sync task to refetch config and teams now
    pub fn request_refresh(&self) {
        self.refresh.notify_one();
    }

    /// Wait until a refresh is requested
    pub async fn refresh_requested(&self) {
        self.refresh.notified().await;
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last snapshot delivery information
    pub fn get_last_update(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let source = self.last_update_source.lock().ok().and_then(|s| s.clone());
        let time = self.last_update_time.lock().ok().and_then(|t| *t);
        (source, time)
    }
}
