//! Configuration snapshot pushed by the backend

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::layout::Layout;

/// Timer phase selected by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    #[default]
    Stopped,
    Running,
    Paused,
}

impl TimerPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Stopped => "stopped",
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
        }
    }
}

impl fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row identifier as stored by the backend (integer or uuid string)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{}", id),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

impl From<&str> for RecordId {
    fn from(raw: &str) -> Self {
        raw.parse::<i64>()
            .map(RecordId::Int)
            .unwrap_or_else(|_| RecordId::Text(raw.to_string()))
    }
}

/// One-shot action as stored in `last_action_payload`
///
/// Kept loosely typed so that kinds this client does not know about still
/// deserialize; [`ActionPayload::action`] decides what is playable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPayload {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

/// A playable action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    Sound { url: String },
    Tts { text: String },
}

impl ActionPayload {
    pub fn sound(url: impl Into<String>) -> Self {
        Self {
            kind: "sound".to_string(),
            payload: serde_json::json!({ "url": url.into() }),
        }
    }

    pub fn tts(text: impl Into<String>) -> Self {
        Self {
            kind: "tts".to_string(),
            payload: serde_json::json!({ "text": text.into() }),
        }
    }

    /// Resolve the payload into a playable action.
    ///
    /// Unknown kinds, and known kinds missing their url/text, yield `None`.
    pub fn action(&self) -> Option<Action> {
        let field = |name: &str| {
            self.payload
                .get(name)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        match self.kind.as_str() {
            "sound" => field("url").map(|url| Action::Sound { url }),
            "tts" => field("text").map(|text| Action::Tts { text }),
            _ => None,
        }
    }
}

/// Full configuration row (`event_config`) replaced wholesale on every push
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    #[serde(default)]
    pub timer_state: TimerPhase,
    #[serde(default)]
    pub timer_duration_seconds: u64,
    #[serde(default)]
    pub timer_remaining: Option<u64>,
    #[serde(default)]
    pub timer_ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub action_counter: u64,
    #[serde(default)]
    pub last_action_payload: Option<ActionPayload>,

    #[serde(default)]
    pub timer_font_size: Option<u32>,
    #[serde(default)]
    pub timer_color: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub note_font_size: Option<u32>,
    #[serde(default)]
    pub note_bold: Option<bool>,
    #[serde(default)]
    pub note_glow_color: Option<String>,
    #[serde(default)]
    pub note_glow_intensity: Option<u32>,

    #[serde(default)]
    pub layout: Option<Layout>,

    #[serde(default)]
    pub shuffle_enabled: bool,
    #[serde(default)]
    pub shuffle_interval_seconds: Option<u64>,
}

impl ConfigSnapshot {
    /// Shuffle period; absent or zero falls back to five minutes
    pub fn shuffle_interval(&self) -> std::time::Duration {
        let secs = self
            .shuffle_interval_seconds
            .filter(|s| *s > 0)
            .unwrap_or(300);
        std::time::Duration::from_secs(secs)
    }
}
