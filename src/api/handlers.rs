//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::state::{AppState, ConfigSnapshot, DisplayView};
use super::responses::{ApiResponse, HealthResponse, StatusResponse};

/// Handle GET /view - Return everything the display should draw
pub async fn view_handler(State(state): State<Arc<AppState>>) -> Result<Json<DisplayView>, StatusCode> {
    match state.get_view() {
        Ok(view) => Ok(Json(view)),
        Err(e) => {
            error!("Failed to get display view: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /snapshot - Push a full configuration snapshot
pub async fn snapshot_handler(
    State(state): State<Arc<AppState>>,
    Json(snapshot): Json<ConfigSnapshot>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let counter = snapshot.action_counter;
    match state.apply_snapshot("http", snapshot) {
        Ok(()) => {
            info!("Snapshot pushed over HTTP (action counter {})", counter);
            Ok(Json(ApiResponse::accepted("Snapshot applied".to_string())))
        }
        Err(e) => {
            error!("Failed to apply pushed snapshot: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /refresh - Refetch config and teams from the backend
pub async fn refresh_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    info!("Refresh endpoint called");
    state.request_refresh();
    Json(ApiResponse::accepted("Refresh scheduled".to_string()))
}

/// Handle GET /status - Return current agent status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let view = match state.get_view() {
        Ok(v) => v,
        Err(e) => {
            error!("Failed to get display view: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let action_counter = match state.get_action_counter() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to get action counter: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_update_source, last_update_time) = state.get_last_update();

    Ok(Json(StatusResponse {
        timer_state: state.get_snapshot().timer_state,
        timer_text: view.timer.text,
        action_counter,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_update_source,
        last_update_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
