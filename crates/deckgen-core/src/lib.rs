//! Deckgen Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! validation shared across all deckgen components.

pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod validation;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{AppError, LogLevel};
pub use session::{Session, SessionStore, UserProfile};
pub use validation::MediaKind;
