//! Keeps the display in step with the backend: polling, push channel, refresh

use std::{sync::Arc, time::Duration};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use crate::{
    services::BackendClient,
    state::{AppState, ConfigSnapshot},
};

const BACKOFF_BASE_MS: u64 = 200;
const BACKOFF_MAX_MS: u64 = 30_000;

/// Fetch teams and config once; failures keep the current display
pub async fn refresh_from_backend(state: &AppState, client: &BackendClient) {
    match client.fetch_display_teams().await {
        Ok(teams) => {
            if let Err(e) = state.set_teams(teams) {
                error!("Failed to store teams: {}", e);
            }
        }
        Err(e) => warn!("Failed to fetch teams: {}", e),
    }

    match client.fetch_display_config().await {
        Ok(config) => {
            // Polling must not restart the tick when nothing changed
            if *state.get_snapshot() == config {
                debug!("Config unchanged");
                return;
            }
            if let Err(e) = state.apply_snapshot("poll", config) {
                error!("Failed to apply config: {}", e);
            }
        }
        Err(e) => warn!("Failed to fetch config: {}", e),
    }
}

/// Background task that polls the backend and serves refresh requests
pub async fn sync_task(state: Arc<AppState>, client: BackendClient, poll_every: Duration) {
    info!("Starting sync task: polling {} every {}s", client.base_url(), poll_every.as_secs());

    let mut poll = interval(poll_every);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = poll.tick() => {
                debug!("Polling backend");
            }
            _ = state.refresh_requested() => {
                info!("Refresh requested, refetching");
                poll.reset();
            }
        }

        refresh_from_backend(&state, &client).await;
    }
}

/// Message received on the push channel
#[derive(Debug, Clone, PartialEq)]
pub enum PushMessage {
    /// Engine.IO handshake; answered with a Socket.IO connect
    Open,
    /// Engine.IO ping; answered with a pong
    Ping,
    /// Generic "something changed, refetch" signal
    Refresh,
    /// Full snapshot delivered inline
    Config(Box<ConfigSnapshot>),
    /// Anything else
    Ignored,
}

/// Parse one text frame.
///
/// Accepts `{"event": .., "data": ..}` objects and Socket.IO event frames
/// of the form `42["event", data]`.
pub fn parse_push_message(text: &str) -> PushMessage {
    let text = text.trim();

    let (event, data) = if let Some(body) = text.strip_prefix("42") {
        match serde_json::from_str::<Vec<Value>>(body) {
            Ok(mut items) if !items.is_empty() => {
                let data = if items.len() > 1 { items.remove(1) } else { Value::Null };
                (items.remove(0), data)
            }
            _ => return PushMessage::Ignored,
        }
    } else if text.starts_with('{') {
        match serde_json::from_str::<Value>(text) {
            Ok(mut object) => (
                object.get_mut("event").map(Value::take).unwrap_or(Value::Null),
                object.get_mut("data").map(Value::take).unwrap_or(Value::Null),
            ),
            Err(_) => return PushMessage::Ignored,
        }
    } else if text == "2" {
        return PushMessage::Ping;
    } else if text.starts_with('0') {
        return PushMessage::Open;
    } else {
        return PushMessage::Ignored;
    };

    match event.as_str() {
        Some("refresh_page") | Some("teams_update") => PushMessage::Refresh,
        Some("config_update") => match serde_json::from_value::<ConfigSnapshot>(data) {
            Ok(snapshot) => PushMessage::Config(Box::new(snapshot)),
            Err(e) => {
                warn!("Malformed config_update payload: {}", e);
                PushMessage::Refresh
            }
        },
        _ => PushMessage::Ignored,
    }
}

/// Background task listening to the WebSocket push channel.
///
/// Reconnects with exponential backoff; polling keeps the display current
/// while disconnected.
pub async fn push_listener_task(state: Arc<AppState>, ws_url: String) {
    info!("Starting push listener for {}", ws_url);

    let mut attempt: u32 = 0;
    loop {
        match connect_async(ws_url.as_str()).await {
            Ok((stream, _)) => {
                info!("Connected to push channel");
                attempt = 0;
                // Catch up on anything missed while disconnected
                state.request_refresh();

                let (mut write, mut read) = stream.split();
                while let Some(next) = read.next().await {
                    let text = match next {
                        Ok(Message::Text(text)) => text,
                        Ok(Message::Close(_)) => break,
                        Ok(_) => continue,
                        Err(e) => {
                            warn!("Push channel read failed: {}", e);
                            break;
                        }
                    };

                    let reply = match parse_push_message(&text) {
                        PushMessage::Open => Some("40"),
                        PushMessage::Ping => Some("3"),
                        PushMessage::Refresh => {
                            debug!("Refresh signal received");
                            state.request_refresh();
                            None
                        }
                        PushMessage::Config(snapshot) => {
                            if let Err(e) = state.apply_snapshot("push", *snapshot) {
                                error!("Failed to apply pushed config: {}", e);
                            }
                            None
                        }
                        PushMessage::Ignored => None,
                    };

                    if let Some(reply) = reply {
                        if let Err(e) = write.send(Message::Text(reply.to_string())).await {
                            warn!("Push channel write failed: {}", e);
                            break;
                        }
                    }
                }
                info!("Disconnected from push channel");
            }
            Err(e) => {
                warn!("Push channel connect failed (attempt {}): {}", attempt + 1, e);
            }
        }

        let backoff_ms = BACKOFF_BASE_MS
            .saturating_mul(1_u64 << attempt.min(16))
            .min(BACKOFF_MAX_MS);
        attempt = attempt.saturating_add(1);
        sleep(Duration::from_millis(backoff_ms)).await;
    }
}
