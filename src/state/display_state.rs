//! Display reducer: latest snapshot plus everything derived from it

use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    action::ActionDispatcher,
    layout::{Layout, RegionBox, Stage},
    snapshot::{Action, ConfigSnapshot},
    style::{NoteView, TimerStyle},
    teams::{Roster, RosterView, Team},
    timer_state::{self, TimerView},
};

/// Everything the public display draws, in one serializable value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayView {
    pub timer: TimerView,
    pub ring_offset: f64,
    pub timer_style: TimerStyle,
    pub note: NoteView,
    pub layout: BTreeMap<String, RegionBox>,
    pub teams: RosterView,
}

/// Holds an immutable snapshot; never mutates it, only replaces it
#[derive(Debug, Clone)]
pub struct DisplayState {
    snapshot: Arc<ConfigSnapshot>,
    teams: Vec<Team>,
    roster: Roster,
    dispatcher: ActionDispatcher,
    stage: Stage,
    timer: TimerView,
}

impl DisplayState {
    /// Empty display with the stage laid out by `initial_layout`
    pub fn new(initial_layout: &Layout) -> Self {
        Self {
            snapshot: Arc::new(ConfigSnapshot::default()),
            teams: Vec::new(),
            roster: Roster::default(),
            dispatcher: ActionDispatcher::new(),
            stage: Stage::with_layout(initial_layout),
            timer: TimerView::default(),
        }
    }

    /// Replace the snapshot wholesale.
    ///
    /// Returns the one-shot action carried by the snapshot if its counter has
    /// not been seen before.
    pub fn apply_snapshot(&mut self, snapshot: ConfigSnapshot, now: DateTime<Utc>) -> Option<Action> {
        let action = self
            .dispatcher
            .observe(snapshot.action_counter, snapshot.last_action_payload.as_ref());

        if let Some(layout) = &snapshot.layout {
            self.stage.apply(layout);
        }

        self.timer = timer_state::render(&snapshot, now);
        self.snapshot = Arc::new(snapshot);
        action
    }

    /// Replace the team list; resets any shuffled order
    pub fn set_teams(&mut self, teams: Vec<Team>) {
        self.roster = Roster::from_teams(&teams);
        self.teams = teams;
    }

    pub fn shuffle_roster(&mut self) {
        self.roster.shuffle();
    }

    /// Store `view` only if it was rendered from the current snapshot
    pub fn set_timer_view_for(&mut self, snapshot: &Arc<ConfigSnapshot>, view: TimerView) -> bool {
        if !Arc::ptr_eq(&self.snapshot, snapshot) {
            return false;
        }
        self.timer = view;
        true
    }

    pub fn snapshot(&self) -> Arc<ConfigSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn last_action_counter(&self) -> Option<u64> {
        self.dispatcher.last_seen()
    }

    pub fn view(&self) -> DisplayView {
        DisplayView {
            timer: self.timer.clone(),
            ring_offset: self.timer.ring_offset(),
            timer_style: TimerStyle::from_snapshot(&self.snapshot),
            note: NoteView::from_snapshot(&self.snapshot),
            layout: self.stage.regions().clone(),
            teams: self.roster.view(),
        }
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new(&Layout::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{
        layout::{Percent, Placement},
        snapshot::{ActionPayload, RecordId, TimerPhase},
    };

    #[test]
    fn test_apply_fires_action_once_across_replays() {
        let mut display = DisplayState::default();
        let snapshot = ConfigSnapshot {
            action_counter: 5,
            last_action_payload: Some(ActionPayload::tts("Ten minutes left")),
            ..Default::default()
        };

        assert!(display.apply_snapshot(snapshot.clone(), Utc::now()).is_some());
        assert!(display.apply_snapshot(snapshot, Utc::now()).is_none());
    }

    #[test]
    fn test_apply_replaces_snapshot_and_renders() {
        let mut display = DisplayState::default();
        display.apply_snapshot(
            ConfigSnapshot {
                timer_state: TimerPhase::Paused,
                timer_duration_seconds: 120,
                timer_remaining: Some(60),
                note: Some("Demos at 5pm".to_string()),
                ..Default::default()
            },
            Utc::now(),
        );

        let view = display.view();
        assert_eq!(view.timer.text, "00:01:00");
        assert_eq!(view.timer.progress_fraction, 0.5);
        assert_eq!(view.note.text, "Demos at 5pm");
        assert_eq!(display.snapshot().timer_remaining, Some(60));
    }

    #[test]
    fn test_layout_kept_when_snapshot_has_none() {
        let mut display = DisplayState::new(&Layout::preset("default").unwrap());

        let mut layout = Layout::default();
        layout
            .0
            .insert("note".to_string(), Placement::new(1.0, 2.0, 3.0, 4.0));
        display.apply_snapshot(
            ConfigSnapshot {
                layout: Some(layout),
                ..Default::default()
            },
            Utc::now(),
        );
        display.apply_snapshot(ConfigSnapshot::default(), Utc::now());

        let view = display.view();
        assert_eq!(view.layout["note"].top, Some(Percent(1.0)));
        assert_eq!(view.layout["timer"].top, Some(Percent(5.0)));
    }

    #[test]
    fn test_teams_feed_roster() {
        let mut display = DisplayState::default();
        display.set_teams(vec![Team {
            id: RecordId::Int(1),
            name: "Borrow Checkers".to_string(),
            visible: true,
            order_index: Some(0),
        }]);
        let view = display.view();
        assert_eq!(view.teams.entries.len(), 2);
        assert_eq!(display.teams().len(), 1);
    }

    #[test]
    fn test_stale_timer_view_rejected() {
        let mut display = DisplayState::default();
        display.apply_snapshot(ConfigSnapshot::default(), Utc::now());
        let old = display.snapshot();
        display.apply_snapshot(ConfigSnapshot::default(), Utc::now());

        assert!(!display.set_timer_view_for(&old, TimerView::expired()));
        let current = display.snapshot();
        assert!(display.set_timer_view_for(&current, TimerView::expired()));
        assert!(display.view().timer.is_expired());
    }
}
