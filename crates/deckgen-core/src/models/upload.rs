use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::validation::MediaKind;

/// One user-selected file plus the content type it will be uploaded with.
/// Created when the user picks a file, consumed once by the upload step.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadRequest {
    /// Validate the selection: non-empty name, non-empty body, and a media
    /// type the generation pipeline accepts.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Bytes,
    ) -> Result<Self, AppError> {
        let file_name = file_name.into();
        let content_type = content_type.into();

        if file_name.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "File name must not be empty".to_string(),
            ));
        }
        if bytes.is_empty() {
            return Err(AppError::InvalidInput(
                "Selected file is empty".to_string(),
            ));
        }
        MediaKind::from_content_type(&content_type)?;

        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// Body for `POST /api/s3urls`. The issuer only reads `fileName`.
#[derive(Debug, Serialize)]
pub struct UploadUrlRequest {
    #[serde(rename = "fileName")]
    pub file_name: String,
}

/// A time-limited URL authorizing a single PUT of one object. Expiry is
/// server-enforced; an expired URL simply fails the PUT.
#[derive(Debug, Deserialize)]
pub struct PresignedUpload {
    #[serde(rename = "uploadUrl")]
    pub url: String,
}

impl PresignedUpload {
    /// Single-use: consume the grant to get the target URL.
    pub fn into_url(self) -> String {
        self.url
    }
}
