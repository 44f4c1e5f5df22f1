use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use event_board::{
    error::ClientError,
    services::{AdminConsole, BackendClient, SubmissionForm},
    state::{AppState, Layout, TimerPhase},
    tasks::refresh_from_backend,
};

#[derive(Clone, Default)]
struct Backend {
    config: Arc<Mutex<Value>>,
    updates: Arc<Mutex<Vec<Value>>>,
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == "secret" {
        Json(json!({ "ok": true })).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Invalid credentials" }))).into_response()
    }
}

async fn get_config(State(backend): State<Backend>) -> Json<Value> {
    Json(backend.config.lock().unwrap().clone())
}

async fn update_config(State(backend): State<Backend>, Json(update): Json<Value>) -> Json<Value> {
    backend.updates.lock().unwrap().push(update);
    Json(json!({ "ok": true }))
}

async fn teams() -> Json<Value> {
    Json(json!([
        { "id": 2, "name": "Rustaceans", "visible": true, "order_index": 1 },
        { "id": 1, "name": "Ferris Fans", "visible": true, "order_index": 0 },
        { "id": 3, "name": "Hidden", "visible": false, "order_index": 2 }
    ]))
}

async fn create_submission() -> Response {
    (StatusCode::CONFLICT, Json(json!({ "error": "Team already submitted" }))).into_response()
}

async fn spawn_backend(config: Value) -> (String, Backend) {
    let backend = Backend {
        config: Arc::new(Mutex::new(config)),
        ..Default::default()
    };
    let app = Router::new()
        .route("/api/config", get(get_config))
        .route("/api/teams", get(teams))
        .route("/api/submissions", post(create_submission))
        .route("/admin/api/auth/login", post(login))
        .route("/admin/api/config", get(get_config).post(update_config))
        .with_state(backend.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), backend)
}

#[tokio::test]
async fn wrong_password_requires_auth() {
    let (url, _) = spawn_backend(json!({})).await;
    let client = BackendClient::new(&url).unwrap();
    let result = AdminConsole::login(client, "admin@example.com", "guess").await;
    assert!(matches!(result, Err(ClientError::AuthRequired)));
}

#[tokio::test]
async fn error_body_becomes_api_message() {
    let (url, _) = spawn_backend(json!({})).await;
    let client = BackendClient::new(&url).unwrap();
    let form = SubmissionForm {
        team_name: "Rustaceans".to_string(),
        project_name: "Board".to_string(),
        project_description: "Shows the clock".to_string(),
        github_link: "https://github.com/example/board".to_string(),
    };

    match client.create_submission(&form).await {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status, 409);
            assert_eq!(message, "Team already submitted");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn pause_freezes_remaining_time() {
    let ends_at = Utc::now() + Duration::seconds(90);
    let (url, backend) = spawn_backend(json!({
        "timer_state": "running",
        "timer_duration_seconds": 300,
        "timer_ends_at": ends_at.to_rfc3339(),
    }))
    .await;

    let client = BackendClient::new(&url).unwrap();
    let console = AdminConsole::login(client, "admin@example.com", "secret").await.unwrap();
    console.pause_timer().await.unwrap();

    let updates = backend.updates.lock().unwrap().clone();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0]["timer_state"], "paused");
    let remaining = updates[0]["timer_remaining"].as_u64().unwrap();
    assert!((88..=90).contains(&remaining), "remaining {}", remaining);
    assert!(updates[0].get("note").is_none());
}

#[tokio::test]
async fn reset_rewinds_to_duration() {
    let (url, backend) = spawn_backend(json!({
        "timer_state": "paused",
        "timer_duration_seconds": 600,
        "timer_remaining": 12,
    }))
    .await;

    let client = BackendClient::new(&url).unwrap();
    let console = AdminConsole::login(client, "admin@example.com", "secret").await.unwrap();
    console.reset_timer().await.unwrap();

    let updates = backend.updates.lock().unwrap().clone();
    assert_eq!(updates[0], json!({ "timer_state": "stopped", "timer_remaining": 600 }));
}

#[tokio::test]
async fn refresh_applies_config_and_teams() {
    let (url, _) = spawn_backend(json!({
        "timer_state": "paused",
        "timer_duration_seconds": 300,
        "timer_remaining": 125,
        "note": "Demos at 5pm",
    }))
    .await;

    let client = BackendClient::new(&url).unwrap();
    let state = AppState::new(0, "127.0.0.1".to_string(), &Layout::preset("default").unwrap());
    refresh_from_backend(&state, &client).await;

    assert_eq!(state.get_snapshot().timer_state, TimerPhase::Paused);
    let view = state.get_view().unwrap();
    assert_eq!(view.timer.text, "00:02:05");
    assert_eq!(view.note.text, "Demos at 5pm");
    assert_eq!(
        view.teams.entries,
        vec!["Ferris Fans", "Rustaceans", "Ferris Fans", "Rustaceans"]
    );
    assert_eq!(state.get_last_update().0.as_deref(), Some("poll"));
}
