//! Event Board - live event display agent, admin console and submissions client
//!
//! The display agent derives a countdown, announcement note, team roster and
//! screen layout from configuration snapshots pushed or polled from the event
//! backend, and serves the result as a view description over HTTP.

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::ClientError;
pub use state::AppState;
pub use utils::signals::shutdown_signal;
