//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::TimerPhase;

/// Response of the push endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
        }
    }

    /// Create an accepted response
    pub fn accepted(message: String) -> Self {
        Self::new("accepted".to_string(), message)
    }
}

/// Display agent status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer_state: TimerPhase,
    pub timer_text: String,
    pub action_counter: Option<u64>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_update_source: Option<String>,
    pub last_update_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
