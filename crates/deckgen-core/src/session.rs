//! Local session state: auth token and user profile.
//!
//! The session is an explicitly owned object with a defined lifecycle
//! (created at login, loaded at startup, cleared at logout), persisted as one
//! JSON file. There is no global mutable auth state anywhere in the client.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// The signed-in user's profile, as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// An authenticated session: bearer token plus the profile it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

/// Loads, saves, and clears the on-disk session file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted session, if any. A missing file is not an error;
    /// a corrupt file is.
    pub fn load(&self) -> Result<Option<Session>, AppError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(AppError::Session(format!(
                    "Failed to read session file {}: {}",
                    self.path.display(),
                    err
                )))
            }
        };

        let session = serde_json::from_str(&raw).map_err(|err| {
            AppError::Session(format!(
                "Session file {} is corrupt: {}",
                self.path.display(),
                err
            ))
        })?;
        Ok(Some(session))
    }

    /// Persist the session, creating parent directories as needed.
    pub fn save(&self, session: &Session) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                AppError::Session(format!(
                    "Failed to create session directory {}: {}",
                    parent.display(),
                    err
                ))
            })?;
        }

        let raw = serde_json::to_string_pretty(session)
            .map_err(|err| AppError::Session(format!("Failed to encode session: {}", err)))?;
        fs::write(&self.path, raw).map_err(|err| {
            AppError::Session(format!(
                "Failed to write session file {}: {}",
                self.path.display(),
                err
            ))
        })
    }

    /// Remove the persisted session. Clearing an absent session is a no-op.
    pub fn clear(&self) -> Result<(), AppError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AppError::Session(format!(
                "Failed to remove session file {}: {}",
                self.path.display(),
                err
            ))),
        }
    }
}
