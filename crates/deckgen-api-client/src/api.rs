//! Domain methods for the deck generation API.
//!
//! Error mapping follows the workflow contract: issuer failures are
//! `AppError::Issuer`, presigned PUT failures are `AppError::Upload`, and a
//! failed status query is `AppError::PollTransport`. None of these are
//! retried here; retry policy lives entirely in the workflow crate.

use bytes::Bytes;
use deckgen_core::models::{DeckGroup, DeckStatus, PresignedUpload, UploadUrlRequest};
use deckgen_core::AppError;
use tracing::debug;

use crate::envelope::decode_body;
use crate::ApiClient;

impl ApiClient {
    /// Request a presigned upload URL for `file_name`.
    ///
    /// `POST /api/s3urls` with `{"fileName": …}`. Non-2xx, an undecodable
    /// body, or a body without `uploadUrl` are all fatal issuer errors.
    pub async fn request_upload_url(&self, file_name: &str) -> Result<PresignedUpload, AppError> {
        let url = self.build_url("/api/s3urls");
        let body = UploadUrlRequest {
            file_name: file_name.to_string(),
        };

        let request = self.apply_auth(self.client().post(&url).json(&body));
        let response = request
            .send()
            .await
            .map_err(|err| AppError::Issuer(format!("Upload-URL request failed: {}", err)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Issuer(format!(
                "Upload-URL request failed with status {}: {}",
                status, error_text
            )));
        }

        let raw = response
            .text()
            .await
            .map_err(|err| AppError::Issuer(format!("Failed to read issuer response: {}", err)))?;

        let (grant, shape) = decode_body::<PresignedUpload>(&raw)
            .map_err(|err| AppError::Issuer(format!("uploadUrl not found in response: {}", err)))?;
        debug!(?shape, "Issued presigned upload URL");
        Ok(grant)
    }

    /// PUT the raw file bytes to a presigned URL.
    ///
    /// A single attempt: any non-2xx response or network failure is fatal for
    /// the current generation attempt. On success the remote side starts
    /// processing the object asynchronously; the status poller observes that.
    pub async fn upload_object(
        &self,
        url: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), AppError> {
        let response = self
            .client()
            .put(url)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|err| AppError::Upload(format!("Upload failed: {}", err)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Upload(format!(
                "Upload failed with status {}: {}",
                status, error_text
            )));
        }

        Ok(())
    }

    /// One status query for a named deck. `GET /api/deck?deck_name=<name>`.
    ///
    /// Network, non-2xx, and parse failures all map to `PollTransport`: the
    /// poll loop aborts on them instead of retrying past them.
    pub async fn check_deck_status(&self, deck_name: &str) -> Result<DeckStatus, AppError> {
        let url = self.build_url("/api/deck");
        let request = self
            .apply_auth(self.client().get(&url))
            .query(&[("deck_name", deck_name)]);

        let response = request
            .send()
            .await
            .map_err(|err| AppError::PollTransport(format!("Status query failed: {}", err)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::PollTransport(format!(
                "Status query failed with status {}: {}",
                status, error_text
            )));
        }

        let raw = response.text().await.map_err(|err| {
            AppError::PollTransport(format!("Failed to read status response: {}", err))
        })?;
        let (deck_status, _) = decode_body::<DeckStatus>(&raw)
            .map_err(|err| AppError::PollTransport(err.to_string()))?;
        Ok(deck_status)
    }

    /// Fetch a deck once, outside the polling loop. A deck that is not
    /// complete yet is reported as `NotFound` rather than waited for.
    pub async fn fetch_deck(&self, deck_name: &str) -> Result<DeckStatus, AppError> {
        let status = self.check_deck_status(deck_name).await?;
        if !status.is_complete() {
            return Err(AppError::NotFound(format!(
                "Deck {:?} is not ready",
                deck_name
            )));
        }
        Ok(status)
    }

    /// List all deck categories. `GET /api/category`.
    pub async fn fetch_categories(&self) -> Result<Vec<String>, AppError> {
        self.get_json("/api/category", &[]).await
    }

    /// List the decks in one category. `GET /api/decklist?category=<c>`.
    pub async fn fetch_deck_list(&self, category: &str) -> Result<Vec<DeckGroup>, AppError> {
        self.get_json("/api/decklist", &[("category", category)]).await
    }

    /// GET a browse endpoint and decode its (possibly enveloped) body.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let url = self.build_url(path);
        let mut request = self.apply_auth(self.client().get(&url));
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request
            .send()
            .await
            .map_err(|err| AppError::Internal(format!("Request to {} failed: {}", path, err)))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(AppError::NotFound(format!("{} returned 404", path)));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Internal(format!(
                "Request to {} failed with status {}: {}",
                path, status, error_text
            )));
        }

        let raw = response
            .text()
            .await
            .map_err(|err| AppError::Internal(format!("Failed to read {}: {}", path, err)))?;
        let (decoded, _) = decode_body(&raw)?;
        Ok(decoded)
    }
}
