//! Services module
//!
//! This module talks to the outside world: the backend HTTP API and the
//! local sound/speech commands.

pub mod admin;
pub mod backend;
pub mod effects;
pub mod submissions;

// Re-export main types
pub use admin::AdminConsole;
pub use backend::{AuthRealm, BackendClient, ConfigUpdate};
pub use effects::EffectPlayer;
pub use submissions::{Submission, SubmissionForm};
