//! HTTP client for the event backend

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    error::{ClientError, ClientResult},
    state::{ActionPayload, ConfigSnapshot, Layout, RecordId, Team, TimerPhase},
};
use super::submissions::{Submission, SubmissionForm};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Partial config update; unset fields are left alone by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_state: Option<TimerPhase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_duration_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_remaining: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_font_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_font_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_glow_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_glow_intensity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shuffle_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shuffle_interval_seconds: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthStatus {
    pub logged_in: bool,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub admin_username: String,
    pub action_type: String,
    #[serde(default)]
    pub details: Value,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Which login endpoint a session belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRealm {
    Admin,
    Submissions,
}

impl AuthRealm {
    fn prefix(&self) -> &'static str {
        match self {
            AuthRealm::Admin => "/admin/api/auth",
            AuthRealm::Submissions => "/submissions/api/auth",
        }
    }
}

/// Thin client over the backend's JSON endpoints.
///
/// Holds a cookie store, so a successful login authenticates every later
/// call made through the same client.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let parsed = reqwest::Url::parse(base_url)
            .map_err(|e| ClientError::validation(format!("invalid backend URL '{}': {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::validation(format!(
                "backend URL must be http or https: {}",
                base_url
            )));
        }

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and decode the JSON body, mapping failures by status
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("Backend responded {} ({} bytes)", status, body.len());

        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::AuthRequired);
        }
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| {
                    if body.trim().is_empty() {
                        status.canonical_reason().unwrap_or("request failed").to_string()
                    } else {
                        body.trim().to_string()
                    }
                });
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        Ok(serde_json::from_str(body)?)
    }

    // Display reads

    pub async fn fetch_display_config(&self) -> ClientResult<ConfigSnapshot> {
        self.send(self.http.get(self.url("/api/config"))).await
    }

    pub async fn fetch_display_teams(&self) -> ClientResult<Vec<Team>> {
        self.send(self.http.get(self.url("/api/teams"))).await
    }

    // Authentication

    pub async fn login(&self, realm: AuthRealm, email: &str, password: &str) -> ClientResult<()> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ClientError::validation("Email and password required"));
        }
        let body = serde_json::json!({ "email": email, "password": password });
        let _: Value = self
            .send(self.http.post(self.url(&format!("{}/login", realm.prefix()))).json(&body))
            .await?;
        Ok(())
    }

    pub async fn logout(&self, realm: AuthRealm) -> ClientResult<()> {
        let _: Value = self
            .send(self.http.post(self.url(&format!("{}/logout", realm.prefix()))))
            .await?;
        Ok(())
    }

    pub async fn auth_status(&self, realm: AuthRealm) -> ClientResult<AuthStatus> {
        self.send(self.http.get(self.url(&format!("{}/status", realm.prefix()))))
            .await
    }

    // Admin API

    pub async fn get_config(&self) -> ClientResult<ConfigSnapshot> {
        self.send(self.http.get(self.url("/admin/api/config"))).await
    }

    pub async fn update_config(&self, update: &ConfigUpdate) -> ClientResult<Value> {
        self.send(self.http.post(self.url("/admin/api/config")).json(update))
            .await
    }

    pub async fn get_teams(&self) -> ClientResult<Vec<Team>> {
        self.send(self.http.get(self.url("/admin/api/teams"))).await
    }

    pub async fn add_team(&self, name: &str) -> ClientResult<Value> {
        let body = serde_json::json!({ "name": name, "visible": true });
        self.send(self.http.post(self.url("/admin/api/teams")).json(&body))
            .await
    }

    pub async fn update_teams(&self, teams: &[Team]) -> ClientResult<Value> {
        let body = serde_json::json!({ "teams": teams });
        self.send(self.http.post(self.url("/admin/api/teams")).json(&body))
            .await
    }

    pub async fn delete_team(&self, id: &RecordId) -> ClientResult<()> {
        let _: Value = self
            .send(self.http.delete(self.url(&format!("/admin/api/teams/{}", id))))
            .await?;
        Ok(())
    }

    pub async fn play_action(&self, action: &ActionPayload) -> ClientResult<Value> {
        self.send(self.http.post(self.url("/admin/api/action/play")).json(action))
            .await
    }

    pub async fn get_audit_logs(&self) -> ClientResult<Vec<AuditEntry>> {
        self.send(self.http.get(self.url("/admin/api/audit"))).await
    }

    // Submissions API

    pub async fn create_submission(&self, form: &SubmissionForm) -> ClientResult<Value> {
        self.send(self.http.post(self.url("/api/submissions")).json(form))
            .await
    }

    pub async fn list_submissions(&self) -> ClientResult<Vec<Submission>> {
        self.send(self.http.get(self.url("/api/submissions"))).await
    }

    pub async fn get_submission(&self, id: &RecordId) -> ClientResult<Submission> {
        self.send(self.http.get(self.url(&format!("/api/submissions/{}", id))))
            .await
    }

    pub async fn update_submission(&self, id: &RecordId, form: &SubmissionForm) -> ClientResult<Value> {
        self.send(self.http.put(self.url(&format!("/api/submissions/{}", id))).json(form))
            .await
    }

    pub async fn delete_submission(&self, id: &RecordId) -> ClientResult<()> {
        let _: Value = self
            .send(self.http.delete(self.url(&format!("/api/submissions/{}", id))))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_malformed_base_url() {
        assert!(matches!(
            BackendClient::new("not a url"),
            Err(ClientError::Validation(_))
        ));
        assert!(matches!(
            BackendClient::new("ftp://example.com"),
            Err(ClientError::Validation(_))
        ));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = BackendClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.url("/api/config"), "http://localhost:5000/api/config");
    }

    #[test]
    fn test_config_update_serializes_only_set_fields() {
        let update = ConfigUpdate {
            timer_state: Some(TimerPhase::Paused),
            timer_remaining: Some(42),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({ "timer_state": "paused", "timer_remaining": 42 })
        );
    }
}
