//! Timer view derivation from a configuration snapshot

use std::f64::consts::PI;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::snapshot::{ConfigSnapshot, TimerPhase};

/// Radius of the progress ring drawn around the countdown
pub const RING_RADIUS: f64 = 45.0;

/// Rendered countdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerView {
    pub phase: TimerPhase,
    pub remaining_seconds: u64,
    /// `HH:MM:SS`
    pub text: String,
    /// Always within `[0, 1]`
    pub progress_fraction: f64,
}

impl TimerView {
    /// Build a view from a remaining/duration pair
    pub fn new(phase: TimerPhase, remaining_seconds: u64, duration_seconds: u64) -> Self {
        Self {
            phase,
            remaining_seconds,
            text: format_hms(remaining_seconds),
            progress_fraction: progress_fraction(remaining_seconds, duration_seconds),
        }
    }

    /// View held once a running countdown reaches zero
    pub fn expired() -> Self {
        Self::new(TimerPhase::Running, 0, 0)
    }

    /// Check if a running countdown has reached zero
    pub fn is_expired(&self) -> bool {
        self.phase == TimerPhase::Running && self.remaining_seconds == 0
    }

    /// Stroke-dash offset of the progress ring
    pub fn ring_offset(&self) -> f64 {
        let circumference = 2.0 * PI * RING_RADIUS;
        circumference - self.progress_fraction * circumference
    }
}

impl Default for TimerView {
    fn default() -> Self {
        Self::new(TimerPhase::Stopped, 0, 0)
    }
}

/// Authoritative remaining seconds at `now`.
///
/// While running, `timer_ends_at` wins and the result is rounded to the
/// nearest second (halves up), never below zero. Otherwise `timer_remaining`
/// is used; a stopped timer without it shows the full duration.
pub fn remaining_seconds(snapshot: &ConfigSnapshot, now: DateTime<Utc>) -> u64 {
    match (snapshot.timer_state, snapshot.timer_ends_at) {
        (TimerPhase::Running, Some(ends_at)) => {
            let millis = (ends_at - now).num_milliseconds();
            if millis <= 0 {
                0
            } else {
                ((millis + 500) / 1000) as u64
            }
        }
        (TimerPhase::Stopped, _) => snapshot
            .timer_remaining
            .unwrap_or(snapshot.timer_duration_seconds),
        // A running snapshot without an end time is treated as paused
        (TimerPhase::Paused, _) | (TimerPhase::Running, None) => {
            snapshot.timer_remaining.unwrap_or(0)
        }
    }
}

/// Derive the countdown view for `snapshot` at `now`
pub fn render(snapshot: &ConfigSnapshot, now: DateTime<Utc>) -> TimerView {
    TimerView::new(
        snapshot.timer_state,
        remaining_seconds(snapshot, now),
        snapshot.timer_duration_seconds,
    )
}

/// Fraction of the countdown left, clamped to `[0, 1]`
pub fn progress_fraction(remaining_seconds: u64, duration_seconds: u64) -> f64 {
    if duration_seconds == 0 {
        return 0.0;
    }
    (remaining_seconds as f64 / duration_seconds.max(1) as f64).clamp(0.0, 1.0)
}

/// Format seconds as zero-padded `HH:MM:SS`
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
