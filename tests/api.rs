use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use event_board::{
    create_router,
    state::{AppState, Layout},
};

fn app() -> (Arc<AppState>, Router) {
    let layout = Layout::preset("default").unwrap();
    let state = Arc::new(AppState::new(20554, "127.0.0.1".to_string(), &layout));
    (Arc::clone(&state), create_router(state))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let (_, app) = app();
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn pushed_snapshot_shows_up_in_view() {
    let (_, app) = app();

    let (status, _) = send(
        &app,
        post_json(
            "/snapshot",
            json!({
                "timer_state": "stopped",
                "timer_duration_seconds": 60,
                "timer_remaining": null,
                "note": "Hacking ends at midnight",
                "timer_color": "#ff0000"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, view) = send(&app, get("/view")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["timer"]["text"], "00:01:00");
    assert_eq!(view["timer"]["progress_fraction"], 1.0);
    assert_eq!(view["note"]["text"], "Hacking ends at midnight");
    assert_eq!(view["timer_style"]["color"], "#ff0000");
    assert_eq!(view["layout"]["timer"]["top"], "5%");
    assert_eq!(view["layout"]["teams"]["left"], "70%");
    assert_eq!(view["teams"]["placeholder"], "No teams yet.");
}

#[tokio::test]
async fn snapshot_layout_overrides_preset() {
    let (_, app) = app();
    let layout = Layout::preset("timer-focus").unwrap();

    let (status, _) = send(&app, post_json("/snapshot", json!({ "layout": layout }))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, view) = send(&app, get("/view")).await;
    assert_eq!(view["layout"]["timer"]["left"], "35%");
    assert_eq!(view["layout"]["timer"]["absolute"], true);
    assert_eq!(view["layout"]["timer"]["right"], Value::Null);
}

#[tokio::test]
async fn malformed_snapshot_is_rejected() {
    let (state, app) = app();
    let (status, _) = send(&app, post_json("/snapshot", json!({ "timer_state": "sideways" }))).await;
    assert!(status.is_client_error());
    assert_eq!(state.get_last_update().0, None);
}

#[tokio::test]
async fn status_tracks_action_counter() {
    let (_, app) = app();
    send(
        &app,
        post_json(
            "/snapshot",
            json!({
                "action_counter": 3,
                "last_action_payload": { "type": "tts", "payload": { "text": "Pizza!" } }
            }),
        ),
    )
    .await;

    let (status, body) = send(&app, get("/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action_counter"], 3);
    assert_eq!(body["last_update_source"], "http");
    assert_eq!(body["timer_state"], "stopped");
}

#[tokio::test]
async fn refresh_wakes_sync() {
    let (state, app) = app();
    let (status, body) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/refresh")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "accepted");

    let woke = tokio::time::timeout(Duration::from_secs(1), state.refresh_requested()).await;
    assert!(woke.is_ok());
}
