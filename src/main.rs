//! Event Board - live event display agent, admin console and submissions client
//!
//! This is the main entry point for the event-board application.

use std::sync::Arc;
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use event_board::{
    api::create_router,
    commands::{run_admin, run_submissions, run_submit},
    config::{Command, Config, DisplayArgs},
    services::{BackendClient, EffectPlayer},
    state::{AppState, Layout},
    tasks::{effect_task, push_listener_task, shuffle_task, sync_task, timer_tick_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("event_board={},tower_http=info", config.log_level()))
        .init();

    let client = BackendClient::new(&config.backend_url)?;

    match config.command {
        Command::Display(args) => run_display(client, args).await,
        Command::Admin(args) => run_admin(client, args).await,
        Command::Submit(fields) => run_submit(client, fields).await,
        Command::Submissions(args) => run_submissions(client, args).await,
    }
}

async fn run_display(client: BackendClient, args: DisplayArgs) -> anyhow::Result<()> {
    info!("Starting event-board display agent v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: backend={}, host={}, port={}, poll={}s",
          client.base_url(), args.host, args.port, args.poll_seconds);

    let initial_layout = Layout::preset(&args.layout_preset)
        .with_context(|| format!("unknown layout preset '{}'", args.layout_preset))?;

    // Create application state
    let state = Arc::new(AppState::new(args.port, args.host.clone(), &initial_layout));

    // Start background tasks before the first fetch so no update is missed
    tokio::spawn(timer_tick_task(Arc::clone(&state)));
    tokio::spawn(shuffle_task(Arc::clone(&state)));
    tokio::spawn(effect_task(
        Arc::clone(&state),
        EffectPlayer::new(args.sound_command.clone(), args.speech_command.clone(), args.alert_sound.clone())
            .with_base_url(client.base_url()),
    ));
    tokio::spawn(sync_task(Arc::clone(&state), client, args.poll_interval()));
    if let Some(ws_url) = args.ws_url.clone() {
        tokio::spawn(push_listener_task(Arc::clone(&state), ws_url));
    }

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = args.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Display agent running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /view     - Current display view");
    info!("  POST /snapshot - Push a configuration snapshot");
    info!("  POST /refresh  - Refetch from the backend");
    info!("  GET  /status   - Agent status");
    info!("  GET  /health   - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Display agent shutdown complete");
    Ok(())
}
