//! The seam between the orchestrator and the HTTP client.
//!
//! The workflow only needs the three network operations of a generation
//! attempt; tests supply a scripted implementation, production code uses
//! [`ApiClient`].

use async_trait::async_trait;
use bytes::Bytes;

use deckgen_api_client::ApiClient;
use deckgen_core::models::{DeckStatus, PresignedUpload};
use deckgen_core::AppError;

/// The remote operations a generation attempt performs, in order.
#[async_trait]
pub trait GenerationApi: Send + Sync {
    /// Ask the issuer for a presigned upload URL for `file_name`.
    async fn request_upload_url(&self, file_name: &str) -> Result<PresignedUpload, AppError>;

    /// PUT the raw bytes to the presigned URL.
    async fn upload_object(
        &self,
        url: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), AppError>;

    /// One status query for the named deck.
    async fn check_deck_status(&self, deck_name: &str) -> Result<DeckStatus, AppError>;
}

#[async_trait]
impl GenerationApi for ApiClient {
    async fn request_upload_url(&self, file_name: &str) -> Result<PresignedUpload, AppError> {
        ApiClient::request_upload_url(self, file_name).await
    }

    async fn upload_object(
        &self,
        url: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), AppError> {
        ApiClient::upload_object(self, url, bytes, content_type).await
    }

    async fn check_deck_status(&self, deck_name: &str) -> Result<DeckStatus, AppError> {
        ApiClient::check_deck_status(self, deck_name).await
    }
}
