//! One-shot action de-duplication keyed by the backend's action counter

use tracing::debug;

use super::snapshot::{Action, ActionPayload};

/// Remembers the last acknowledged action counter
///
/// `None` sorts below every counter the backend can send, so the first
/// snapshot observed always counts as new.
#[derive(Debug, Clone, Default)]
pub struct ActionDispatcher {
    last_seen: Option<u64>,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self { last_seen: None }
    }

    /// Last acknowledged counter, if any
    pub fn last_seen(&self) -> Option<u64> {
        self.last_seen
    }

    /// Observe a counter/payload pair from a snapshot.
    ///
    /// Returns the action to fire when `counter` is strictly greater than
    /// anything acknowledged so far. The counter is acknowledged even if the
    /// payload is missing or of an unknown kind, so replays stay silent.
    pub fn observe(&mut self, counter: u64, payload: Option<&ActionPayload>) -> Option<Action> {
        if self.last_seen.is_some_and(|last| counter <= last) {
            return None;
        }
        self.last_seen = Some(counter);

        let Some(payload) = payload else {
            debug!("Action counter {} has no payload", counter);
            return None;
        };

        let action = payload.action();
        if action.is_none() {
            debug!("Ignoring action of kind '{}' at counter {}", payload.kind, counter);
        }
        action
    }
}
