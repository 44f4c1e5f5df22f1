//! Utility functions module
//!
//! Process-level helpers shared by the display agent.

pub mod signals;

// Re-export main functions
pub use signals::shutdown_signal;
