//! Validation modules

pub mod media;

pub use media::{MediaKind, ALLOWED_CONTENT_TYPES};
