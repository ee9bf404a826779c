//! Error types module
//!
//! All errors in the generation workflow are unified under the `AppError`
//! enum. The four network-facing variants (`Issuer`, `Upload`,
//! `PollTransport`, `PollTimeout`) are fatal for the current generation
//! attempt: none of them are retried automatically, the user has to restart
//! the flow. The only retried condition in the whole client is a status
//! query that comes back not-yet-complete.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like an exhausted poll budget
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The upload-URL issuer returned non-2xx or a body without `uploadUrl`.
    #[error("Issuer error: {0}")]
    Issuer(String),

    /// The PUT to the presigned URL failed (non-2xx or network failure).
    #[error("Upload error: {0}")]
    Upload(String),

    /// A single status query failed at the network or parse level. Aborts
    /// the poll loop immediately; not treated as a transient condition.
    #[error("Status query failed: {0}")]
    PollTransport(String),

    /// The poll attempt budget ran out without a complete status.
    #[error("Deck not ready after {attempts} poll attempts")]
    PollTimeout { attempts: u32 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The generation trigger was invoked while an attempt was in flight.
    #[error("A generation is already in flight")]
    GenerationInFlight,

    /// The in-flight generation was cancelled (teardown or explicit cancel).
    #[error("Generation cancelled")]
    Cancelled,

    #[error("Session error: {0}")]
    Session(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// The one message every workflow failure surfaces to the user. Individual
/// causes stay in the logs; the UI contract is a single generic notification.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "An error occurred during the process. Please try again.";

impl AppError {
    /// Whether re-running the whole generation flow may succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Issuer(_)
            | AppError::Upload(_)
            | AppError::PollTransport(_)
            | AppError::PollTimeout { .. }
            | AppError::GenerationInFlight
            | AppError::Cancelled => true,
            AppError::InvalidInput(_)
            | AppError::NotFound(_)
            | AppError::Session(_)
            | AppError::Internal(_) => false,
        }
    }

    /// Client-facing message (may differ from the internal error message).
    pub fn client_message(&self) -> String {
        match self {
            AppError::Issuer(_)
            | AppError::Upload(_)
            | AppError::PollTransport(_)
            | AppError::PollTimeout { .. } => GENERIC_FAILURE_MESSAGE.to_string(),
            AppError::GenerationInFlight => {
                "A deck is already being generated. Wait for it to finish.".to_string()
            }
            AppError::Cancelled => "Generation was cancelled.".to_string(),
            AppError::InvalidInput(msg) | AppError::NotFound(msg) | AppError::Session(msg) => {
                msg.clone()
            }
            AppError::Internal(_) => "Internal error".to_string(),
        }
    }

    /// Log level for this error
    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::InvalidInput(_) | AppError::NotFound(_) | AppError::Cancelled => {
                LogLevel::Debug
            }
            AppError::PollTimeout { .. } | AppError::GenerationInFlight => LogLevel::Warn,
            AppError::Issuer(_)
            | AppError::Upload(_)
            | AppError::PollTransport(_)
            | AppError::Session(_)
            | AppError::Internal(_) => LogLevel::Error,
        }
    }
}
