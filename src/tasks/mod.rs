//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod effects;
pub mod shuffle;
pub mod sync;
pub mod ticker;

// Re-export main functions
pub use effects::effect_task;
pub use shuffle::shuffle_task;
pub use sync::{push_listener_task, refresh_from_backend, sync_task};
pub use ticker::{timer_tick_task, TickHandle};
