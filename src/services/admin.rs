//! Admin console operations built on the backend client

use chrono::Utc;
use serde_json::Value;
use tracing::info;

use crate::{
    error::{ClientError, ClientResult},
    state::{timer_state, ActionPayload, ConfigSnapshot, Layout, RecordId, Team, TimerPhase},
    state::style::hex_to_rgb,
};
use super::backend::{AuditEntry, AuthRealm, AuthStatus, BackendClient, ConfigUpdate};

pub const DEFAULT_ALERT_SOUND: &str = "/assets/sounds/alert.mp3";

/// Note settings edited together from the console
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteSettings {
    pub text: String,
    pub font_size: Option<u32>,
    pub glow_color: Option<String>,
    pub glow_intensity: Option<u32>,
    pub bold: Option<bool>,
}

/// Authenticated admin session
#[derive(Debug, Clone)]
pub struct AdminConsole {
    client: BackendClient,
}

impl AdminConsole {
    /// Log in and keep the session cookie for later calls
    pub async fn login(client: BackendClient, email: &str, password: &str) -> ClientResult<Self> {
        client.login(AuthRealm::Admin, email, password).await?;
        info!("Logged in as {}", email);
        Ok(Self { client })
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.client.logout(AuthRealm::Admin).await
    }

    pub async fn status(&self) -> ClientResult<AuthStatus> {
        self.client.auth_status(AuthRealm::Admin).await
    }

    pub async fn config(&self) -> ClientResult<ConfigSnapshot> {
        self.client.get_config().await
    }

    // Timer

    /// Set the countdown length; also resets the remaining time to it
    pub async fn set_timer(&self, duration_seconds: u64) -> ClientResult<Value> {
        self.client
            .update_config(&ConfigUpdate {
                timer_duration_seconds: Some(duration_seconds),
                timer_remaining: Some(duration_seconds),
                ..Default::default()
            })
            .await
    }

    /// Start or resume; the backend computes `timer_ends_at`
    pub async fn start_timer(&self) -> ClientResult<Value> {
        self.client
            .update_config(&ConfigUpdate {
                timer_state: Some(TimerPhase::Running),
                ..Default::default()
            })
            .await
    }

    /// Freeze the countdown at what the display currently shows
    pub async fn pause_timer(&self) -> ClientResult<Value> {
        let config = self.client.get_config().await?;
        let remaining = timer_state::remaining_seconds(&config, Utc::now());
        info!("Pausing timer with {} seconds remaining", remaining);

        self.client
            .update_config(&ConfigUpdate {
                timer_state: Some(TimerPhase::Paused),
                timer_remaining: Some(remaining),
                ..Default::default()
            })
            .await
    }

    /// Stop and rewind to the full duration
    pub async fn reset_timer(&self) -> ClientResult<Value> {
        let config = self.client.get_config().await?;
        self.client
            .update_config(&ConfigUpdate {
                timer_state: Some(TimerPhase::Stopped),
                timer_remaining: Some(config.timer_duration_seconds),
                ..Default::default()
            })
            .await
    }

    pub async fn set_timer_style(&self, font_size: Option<u32>, color: Option<String>) -> ClientResult<Value> {
        if font_size.is_none() && color.is_none() {
            return Err(ClientError::validation("Nothing to update: give a font size or a colour"));
        }
        if let Some(color) = &color {
            check_color(color)?;
        }
        self.client
            .update_config(&ConfigUpdate {
                timer_font_size: font_size,
                timer_color: color,
                ..Default::default()
            })
            .await
    }

    // Note

    pub async fn set_note(&self, settings: NoteSettings) -> ClientResult<Value> {
        if let Some(color) = &settings.glow_color {
            check_color(color)?;
        }
        if settings.glow_intensity.is_some_and(|i| i > 100) {
            return Err(ClientError::validation("Glow intensity must be between 0 and 100"));
        }
        self.client
            .update_config(&ConfigUpdate {
                note: Some(settings.text),
                note_font_size: settings.font_size,
                note_bold: settings.bold,
                note_glow_color: settings.glow_color,
                note_glow_intensity: settings.glow_intensity,
                ..Default::default()
            })
            .await
    }

    // Teams

    pub async fn teams(&self) -> ClientResult<Vec<Team>> {
        self.client.get_teams().await
    }

    pub async fn add_team(&self, name: &str) -> ClientResult<Value> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::validation("Team name is required"));
        }
        self.client.add_team(name).await
    }

    pub async fn remove_team(&self, id: &RecordId) -> ClientResult<()> {
        self.client.delete_team(id).await
    }

    /// Show or hide one team on the display
    pub async fn set_team_visible(&self, id: &RecordId, visible: bool) -> ClientResult<Value> {
        let mut teams = self.client.get_teams().await?;
        let team = teams
            .iter_mut()
            .find(|team| &team.id == id)
            .ok_or_else(|| ClientError::validation(format!("No team with id {}", id)))?;
        team.visible = visible;
        self.client.update_teams(&teams).await
    }

    // Actions

    pub async fn play_sound(&self, url: &str) -> ClientResult<Value> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ClientError::validation("Sound URL is required"));
        }
        self.client.play_action(&ActionPayload::sound(url)).await
    }

    pub async fn speak(&self, text: &str) -> ClientResult<Value> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ClientError::validation("Message text is required"));
        }
        self.client.play_action(&ActionPayload::tts(text)).await
    }

    // Layout and shuffle

    pub async fn apply_layout_preset(&self, name: &str) -> ClientResult<Value> {
        let layout = Layout::preset(name).ok_or_else(|| {
            ClientError::validation(format!(
                "Unknown layout preset '{}' (available: {})",
                name,
                Layout::preset_names().join(", ")
            ))
        })?;
        self.client
            .update_config(&ConfigUpdate {
                layout: Some(layout),
                ..Default::default()
            })
            .await
    }

    pub async fn set_shuffle(&self, enabled: bool, interval_seconds: Option<u64>) -> ClientResult<Value> {
        if interval_seconds == Some(0) {
            return Err(ClientError::validation("Shuffle interval must be at least one second"));
        }
        self.client
            .update_config(&ConfigUpdate {
                shuffle_enabled: Some(enabled),
                shuffle_interval_seconds: interval_seconds,
                ..Default::default()
            })
            .await
    }

    pub async fn audit_log(&self) -> ClientResult<Vec<AuditEntry>> {
        self.client.get_audit_logs().await
    }
}

fn check_color(color: &str) -> ClientResult<()> {
    hex_to_rgb(color)
        .map(|_| ())
        .ok_or_else(|| ClientError::validation(format!("'{}' is not a #rrggbb colour", color)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_color() {
        assert!(check_color("#1e3a8a").is_ok());
        assert!(check_color("blue").is_err());
    }
}
