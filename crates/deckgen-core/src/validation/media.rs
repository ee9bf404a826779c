//! Media-type validation for generation uploads.
//!
//! The generation pipeline transcribes lecture recordings, so only one video
//! container and four audio formats are accepted. Anything else is rejected
//! before the workflow takes a single step.

use crate::error::AppError;

/// Content types the generation pipeline accepts, in the order they are
/// listed to the user.
pub const ALLOWED_CONTENT_TYPES: [&str; 5] = [
    "video/mp4",
    "audio/wav",
    "audio/mp3",
    "audio/flac",
    "audio/ogg",
];

/// A supported lecture media format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Mp4,
    Wav,
    Mp3,
    Flac,
    Ogg,
}

impl MediaKind {
    /// Map a declared MIME type to a supported format.
    pub fn from_content_type(content_type: &str) -> Result<Self, AppError> {
        match content_type {
            "video/mp4" => Ok(MediaKind::Mp4),
            "audio/wav" => Ok(MediaKind::Wav),
            "audio/mp3" => Ok(MediaKind::Mp3),
            "audio/flac" => Ok(MediaKind::Flac),
            "audio/ogg" => Ok(MediaKind::Ogg),
            other => Err(AppError::InvalidInput(format!(
                "Unsupported media type {:?}. Please upload MP4, WAV, MP3, FLAC, or OGG files only.",
                other
            ))),
        }
    }

    /// Map a file extension (case-insensitive, no dot) to a supported format.
    pub fn from_extension(extension: &str) -> Result<Self, AppError> {
        match extension.to_ascii_lowercase().as_str() {
            "mp4" => Ok(MediaKind::Mp4),
            "wav" => Ok(MediaKind::Wav),
            "mp3" => Ok(MediaKind::Mp3),
            "flac" => Ok(MediaKind::Flac),
            "ogg" => Ok(MediaKind::Ogg),
            other => Err(AppError::InvalidInput(format!(
                "Unsupported file extension {:?}. Please upload MP4, WAV, MP3, FLAC, or OGG files only.",
                other
            ))),
        }
    }

    /// The MIME type sent as the upload's `Content-Type` header.
    pub fn content_type(&self) -> &'static str {
        match self {
            MediaKind::Mp4 => "video/mp4",
            MediaKind::Wav => "audio/wav",
            MediaKind::Mp3 => "audio/mp3",
            MediaKind::Flac => "audio/flac",
            MediaKind::Ogg => "audio/ogg",
        }
    }
}
