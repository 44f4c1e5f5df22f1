//! State management module
//!
//! This module contains the snapshot model, the pure reducers deriving the
//! display from it, and the shared state of the display agent.

pub mod action;
pub mod app_state;
pub mod display_state;
pub mod layout;
pub mod snapshot;
pub mod style;
pub mod teams;
pub mod timer_state;

// Re-export main types
pub use action::ActionDispatcher;
pub use app_state::{AppState, Effect};
pub use display_state::{DisplayState, DisplayView};
pub use layout::{Layout, Stage};
pub use snapshot::{Action, ActionPayload, ConfigSnapshot, RecordId, TimerPhase};
pub use teams::Team;
pub use timer_state::TimerView;
