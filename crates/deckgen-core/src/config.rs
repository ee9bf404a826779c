//! Configuration module
//!
//! Env-var driven client configuration with defaults matching the deployed
//! service contract. `dotenvy` is loaded by the binaries before this runs.

use std::env;
use std::path::PathBuf;

use crate::error::AppError;

// Contract constants for the deployed generation service. The status poller's
// budget and interval are part of the service contract, not tuning knobs:
// ~100 x 3000 ms covers the worst observed transcription time.
const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;
const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 100;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Client configuration for the deck generation API.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the deck API gateway, without a trailing slash.
    pub base_url: String,
    /// Fixed delay between status polls, in milliseconds.
    pub poll_interval_ms: u64,
    /// Maximum number of status polls before giving up.
    pub poll_max_attempts: u32,
    /// Timeout for individual HTTP requests (issuer, upload, status query).
    pub http_timeout_secs: u64,
    /// Where the on-disk session (auth token + profile) lives.
    pub session_path: PathBuf,
}

impl ClientConfig {
    /// Load configuration from the environment.
    ///
    /// `DECKGEN_API_URL` is required; everything else has a default.
    pub fn from_env() -> Result<Self, AppError> {
        let base_url = env::var("DECKGEN_API_URL")
            .map_err(|_| AppError::InvalidInput("DECKGEN_API_URL is not set".to_string()))?;

        let config = Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            poll_interval_ms: env_parse("DECKGEN_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS)?,
            poll_max_attempts: env_parse("DECKGEN_POLL_MAX_ATTEMPTS", DEFAULT_POLL_MAX_ATTEMPTS)?,
            http_timeout_secs: env_parse("DECKGEN_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?,
            session_path: env::var("DECKGEN_SESSION_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_session_path()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.base_url.is_empty() {
            return Err(AppError::InvalidInput(
                "API base URL must not be empty".to_string(),
            ));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(AppError::InvalidInput(format!(
                "API base URL must be http(s): {}",
                self.base_url
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(AppError::InvalidInput(
                "Poll interval must be at least 1 ms".to_string(),
            ));
        }
        if self.poll_max_attempts == 0 {
            return Err(AppError::InvalidInput(
                "Poll attempt budget must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::InvalidInput(format!("{} is not a valid value: {}", key, raw))),
        Err(_) => Ok(default),
    }
}

fn default_session_path() -> PathBuf {
    // ~/.deckgen/session.json, falling back to the working directory when no
    // home directory is available.
    env::var("HOME")
        .map(|home| PathBuf::from(home).join(".deckgen").join("session.json"))
        .unwrap_or_else(|_| PathBuf::from(".deckgen-session.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> ClientConfig {
        ClientConfig {
            base_url: "https://api.example.com/prod".to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            poll_max_attempts: DEFAULT_POLL_MAX_ATTEMPTS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            session_path: PathBuf::from("/tmp/session.json"),
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(base_config().validate().is_ok());
        assert_eq!(base_config().poll_interval_ms, 3000);
        assert_eq!(base_config().poll_max_attempts, 100);
    }

    #[test]
    fn rejects_non_http_base_url() {
        let mut config = base_config();
        config.base_url = "ftp://api.example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_poll_budget() {
        let mut config = base_config();
        config.poll_max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = base_config();
        config.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }
}
