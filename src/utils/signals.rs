//! Signal handling for graceful shutdown of the display agent

use futures::stream::StreamExt;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use tracing::{info, warn};

/// Wait for SIGTERM or SIGINT and return the signal received.
///
/// Falls back to Ctrl-C alone if the handler cannot be installed.
pub async fn shutdown_signal() -> Option<i32> {
    let mut signals = match Signals::new([SIGTERM, SIGINT]) {
        Ok(signals) => signals,
        Err(e) => {
            warn!("Failed to install signal handler ({}), waiting for Ctrl-C only", e);
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to wait for Ctrl-C: {}", e);
            }
            return None;
        }
    };

    let handle = signals.handle();
    let received = signals.next().await;
    handle.close();

    if let Some(signal) = received {
        info!("Received {}", signal_name(signal));
    }
    received
}

fn signal_name(signal: i32) -> &'static str {
    match signal {
        SIGTERM => "SIGTERM",
        SIGINT => "SIGINT",
        _ => "signal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_names() {
        assert_eq!(signal_name(SIGTERM), "SIGTERM");
        assert_eq!(signal_name(SIGINT), "SIGINT");
        assert_eq!(signal_name(-1), "signal");
    }
}
