//! Deck status poller.
//!
//! A fixed-interval, fixed-budget retry loop. The only retried condition is
//! "not complete yet"; a status query that fails at the transport or parse
//! level aborts the loop immediately. A `status: "error"` response is retried
//! exactly like a pending one until the budget runs out; on the deployed
//! service, transient pipeline errors later flip to complete.

use std::time::Duration;

use deckgen_core::models::{DeckPhase, DeckStatus};
use deckgen_core::{AppError, ClientConfig};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::GenerationApi;

/// Polling budget: how many status queries to issue and how long to wait
/// between them.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl PollConfig {
    pub fn from_client_config(config: &ClientConfig) -> Self {
        Self {
            max_attempts: config.poll_max_attempts,
            interval: Duration::from_millis(config.poll_interval_ms),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 100,
            interval: Duration::from_millis(3000),
        }
    }
}

/// Poll the status endpoint until the deck reports complete.
///
/// The attempt counter pre-increments before each query, so `on_attempt` sees
/// 1-based attempt numbers. Each query is followed by a full interval sleep,
/// giving a worst case of `max_attempts * interval` elapsed before
/// [`AppError::PollTimeout`]. Cancellation is honored at every suspension
/// point and yields [`AppError::Cancelled`].
pub async fn poll_until_complete<A: GenerationApi + ?Sized>(
    api: &A,
    deck_name: &str,
    config: &PollConfig,
    cancel: &CancellationToken,
    mut on_attempt: impl FnMut(u32),
) -> Result<DeckStatus, AppError> {
    for attempt in 1..=config.max_attempts {
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }
        on_attempt(attempt);

        let status = tokio::select! {
            result = api.check_deck_status(deck_name) => result?,
            _ = cancel.cancelled() => return Err(AppError::Cancelled),
        };

        match status.status {
            DeckPhase::Complete => {
                debug!(deck_name, attempt, "Deck is complete");
                return Ok(status);
            }
            DeckPhase::Error => {
                // Retried like pending; only the attempt budget stops it.
                warn!(
                    deck_name,
                    attempt,
                    message = status.message.as_deref().unwrap_or(""),
                    "Deck reported an error status; continuing to poll"
                );
            }
            DeckPhase::Pending => {
                debug!(deck_name, attempt, "Deck not ready yet");
            }
        }

        tokio::select! {
            _ = sleep(config.interval) => {}
            _ = cancel.cancelled() => return Err(AppError::Cancelled),
        }
    }

    Err(AppError::PollTimeout {
        attempts: config.max_attempts,
    })
}
