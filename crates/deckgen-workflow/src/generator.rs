//! Generation workflow orchestrator.
//!
//! One [`Generator`] owns one generation state machine. The trigger is
//! guarded by a single-permit semaphore, so a second trigger while an attempt
//! is in flight returns [`AppError::GenerationInFlight`] without touching the
//! issuer. Progress is published through a watch channel for the
//! presentation layer; dropping the generator cancels any in-flight polling.

use std::sync::Arc;

use deckgen_core::models::{Deck, UploadRequest};
use deckgen_core::{AppError, MediaKind};
use tokio::sync::{watch, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api::GenerationApi;
use crate::poller::{poll_until_complete, PollConfig};

/// UI-visible state of a generation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    AwaitingUploadUrl,
    Uploading,
    Polling { attempt: u32 },
    Succeeded { payload: String },
    Failed { reason: String },
}

impl GenerationState {
    /// Short display name for progress output.
    pub fn name(&self) -> &'static str {
        match self {
            GenerationState::Idle => "idle",
            GenerationState::AwaitingUploadUrl => "awaiting-upload-url",
            GenerationState::Uploading => "uploading",
            GenerationState::Polling { .. } => "polling",
            GenerationState::Succeeded { .. } => "succeeded",
            GenerationState::Failed { .. } => "failed",
        }
    }
}

/// Sequences one generation attempt: issue URL, upload, poll.
pub struct Generator<A: GenerationApi> {
    api: Arc<A>,
    poll: PollConfig,
    state_tx: watch::Sender<GenerationState>,
    in_flight: Semaphore,
    cancel: CancellationToken,
}

impl<A: GenerationApi> Generator<A> {
    pub fn new(api: Arc<A>, poll: PollConfig) -> Self {
        let (state_tx, _) = watch::channel(GenerationState::Idle);
        Self {
            api,
            poll,
            state_tx,
            in_flight: Semaphore::new(1),
            cancel: CancellationToken::new(),
        }
    }

    /// Watch the workflow state (for progress display).
    pub fn subscribe(&self) -> watch::Receiver<GenerationState> {
        self.state_tx.subscribe()
    }

    /// The current workflow state.
    pub fn state(&self) -> GenerationState {
        self.state_tx.borrow().clone()
    }

    /// Run one generation attempt for `deck_name` with the selected file.
    ///
    /// Input validation happens before any state transition or network call:
    /// an empty deck name or a disallowed media type is rejected while the
    /// machine stays wherever it was. At most one attempt runs at a time; a
    /// concurrent trigger is a no-op that reports `GenerationInFlight`.
    pub async fn generate(
        &self,
        deck_name: &str,
        request: UploadRequest,
    ) -> Result<Deck, AppError> {
        if deck_name.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Please enter a deck name.".to_string(),
            ));
        }
        MediaKind::from_content_type(&request.content_type)?;

        let _permit = self
            .in_flight
            .try_acquire()
            .map_err(|_| AppError::GenerationInFlight)?;

        let result = self.run_attempt(deck_name, request).await;
        match &result {
            Ok(deck) => {
                info!(deck_name, cards = deck.len(), "Deck generation complete");
                self.set_state(GenerationState::Succeeded {
                    payload: deck.to_tsv(),
                });
            }
            Err(err) => {
                warn!(deck_name, error = %err, "Deck generation failed");
                self.set_state(GenerationState::Failed {
                    reason: err.client_message(),
                });
            }
        }
        result
    }

    /// Acknowledge a finished attempt, returning the machine to `Idle`.
    pub fn acknowledge(&self) {
        if matches!(
            self.state(),
            GenerationState::Succeeded { .. } | GenerationState::Failed { .. }
        ) {
            self.set_state(GenerationState::Idle);
        }
    }

    /// Cancel any in-flight attempt. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    async fn run_attempt(&self, deck_name: &str, request: UploadRequest) -> Result<Deck, AppError> {
        self.set_state(GenerationState::AwaitingUploadUrl);

        // The issuer keys the object as "<deck>.mp4" for every media type;
        // the real content type only travels in the PUT header.
        let remote_name = format!("{}.mp4", deck_name);
        info!(
            deck_name,
            file = %request.file_name,
            size_bytes = request.size_bytes(),
            "Requesting upload URL"
        );
        let grant = tokio::select! {
            result = self.api.request_upload_url(&remote_name) => result?,
            _ = self.cancel.cancelled() => return Err(AppError::Cancelled),
        };

        self.set_state(GenerationState::Uploading);
        let url = grant.into_url();
        tokio::select! {
            result = self.api.upload_object(&url, request.bytes, &request.content_type) => result?,
            _ = self.cancel.cancelled() => return Err(AppError::Cancelled),
        };

        self.set_state(GenerationState::Polling { attempt: 0 });
        let status = poll_until_complete(
            self.api.as_ref(),
            deck_name,
            &self.poll,
            &self.cancel,
            |attempt| self.set_state(GenerationState::Polling { attempt }),
        )
        .await?;

        let payload = status.data.ok_or_else(|| {
            AppError::Internal("Status reported complete without deck data".to_string())
        })?;
        Ok(Deck::parse_tsv(deck_name, &payload))
    }

    fn set_state(&self, state: GenerationState) {
        self.state_tx.send_replace(state);
    }
}

impl<A: GenerationApi> Drop for Generator<A> {
    fn drop(&mut self) {
        // Teardown must not leave a polling loop running in the background.
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use deckgen_core::models::{DeckPhase, DeckStatus, PresignedUpload};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;

    #[derive(Default)]
    struct MockApi {
        issuer_calls: AtomicU32,
        upload_calls: AtomicU32,
        status_calls: AtomicU32,
        issuer_fails: bool,
        upload_fails: bool,
        /// Status script; the last entry repeats once exhausted.
        statuses: Mutex<Vec<Result<DeckStatus, AppError>>>,
        seen_file_names: Mutex<Vec<String>>,
        seen_upload_urls: Mutex<Vec<String>>,
    }

    impl MockApi {
        fn completing(payload: &str) -> Self {
            Self {
                statuses: Mutex::new(vec![Ok(DeckStatus {
                    status: DeckPhase::Complete,
                    message: None,
                    data: Some(payload.to_string()),
                })]),
                ..Default::default()
            }
        }

        fn pending_forever() -> Self {
            Self {
                statuses: Mutex::new(vec![Ok(DeckStatus {
                    status: DeckPhase::Pending,
                    message: None,
                    data: None,
                })]),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl GenerationApi for MockApi {
        async fn request_upload_url(&self, file_name: &str) -> Result<PresignedUpload, AppError> {
            self.issuer_calls.fetch_add(1, Ordering::SeqCst);
            self.seen_file_names
                .lock()
                .unwrap()
                .push(file_name.to_string());
            if self.issuer_fails {
                return Err(AppError::Issuer("503".to_string()));
            }
            Ok(PresignedUpload {
                url: "https://bucket/object?sig=x".to_string(),
            })
        }

        async fn upload_object(&self, url: &str, _: Bytes, _: &str) -> Result<(), AppError> {
            self.upload_calls.fetch_add(1, Ordering::SeqCst);
            self.seen_upload_urls.lock().unwrap().push(url.to_string());
            if self.upload_fails {
                return Err(AppError::Upload("403".to_string()));
            }
            Ok(())
        }

        async fn check_deck_status(&self, _: &str) -> Result<DeckStatus, AppError> {
            self.status_calls.fetch_add(1, Ordering::SeqCst);
            let mut statuses = self.statuses.lock().unwrap();
            if statuses.len() > 1 {
                statuses.remove(0)
            } else {
                match &statuses[0] {
                    Ok(status) => Ok(status.clone()),
                    Err(_) => Err(AppError::PollTransport("scripted".to_string())),
                }
            }
        }
    }

    fn request() -> UploadRequest {
        UploadRequest::new("lecture.mp4", "video/mp4", Bytes::from_static(b"bytes")).unwrap()
    }

    fn generator(api: MockApi) -> Generator<MockApi> {
        Generator::new(Arc::new(api), PollConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_one_poll_when_deck_is_ready() {
        let gen = generator(MockApi::completing(
            "apple\tWhat fruit is red?\nbanana\tWhat fruit is yellow?",
        ));

        let deck = gen.generate("fruit", request()).await.unwrap();

        assert_eq!(deck.len(), 2);
        assert_eq!(deck.cards[0].answer, "apple");
        assert_eq!(gen.api.issuer_calls.load(Ordering::SeqCst), 1);
        assert_eq!(gen.api.upload_calls.load(Ordering::SeqCst), 1);
        assert_eq!(gen.api.status_calls.load(Ordering::SeqCst), 1);
        assert!(matches!(gen.state(), GenerationState::Succeeded { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn issuer_is_called_with_deck_name_dot_mp4() {
        let gen = generator(MockApi::completing("a\tq"));
        gen.generate("biology", request()).await.unwrap();
        assert_eq!(
            *gen.api.seen_file_names.lock().unwrap(),
            vec!["biology.mp4".to_string()]
        );
        assert_eq!(
            *gen.api.seen_upload_urls.lock().unwrap(),
            vec!["https://bucket/object?sig=x".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn rejects_disallowed_media_type_without_any_transition() {
        let gen = generator(MockApi::completing("a\tq"));
        let bad = UploadRequest {
            file_name: "notes.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: Bytes::from_static(b"x"),
        };

        let err = gen.generate("biology", bad).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(gen.state(), GenerationState::Idle);
        assert_eq!(gen.api.issuer_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rejects_empty_deck_name_without_any_transition() {
        let gen = generator(MockApi::completing("a\tq"));
        let err = gen.generate("   ", request()).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(gen.state(), GenerationState::Idle);
        assert_eq!(gen.api.issuer_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn issuer_failure_fails_without_upload() {
        let gen = generator(MockApi {
            issuer_fails: true,
            ..MockApi::completing("a\tq")
        });

        let err = gen.generate("biology", request()).await.unwrap_err();

        assert!(matches!(err, AppError::Issuer(_)));
        assert_eq!(gen.api.upload_calls.load(Ordering::SeqCst), 0);
        assert!(matches!(gen.state(), GenerationState::Failed { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn upload_failure_fails_without_polling() {
        let gen = generator(MockApi {
            upload_fails: true,
            ..MockApi::completing("a\tq")
        });

        let err = gen.generate("biology", request()).await.unwrap_err();

        assert!(matches!(err, AppError::Upload(_)));
        assert_eq!(gen.api.status_calls.load(Ordering::SeqCst), 0);
        assert!(matches!(gen.state(), GenerationState::Failed { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn poll_transport_error_fails_immediately() {
        let gen = generator(MockApi {
            statuses: Mutex::new(vec![Err(AppError::PollTransport("502".to_string()))]),
            ..Default::default()
        });

        let err = gen.generate("biology", request()).await.unwrap_err();

        assert!(matches!(err, AppError::PollTransport(_)));
        assert_eq!(gen.api.status_calls.load(Ordering::SeqCst), 1);
        assert!(matches!(gen.state(), GenerationState::Failed { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn pending_forever_times_out_after_the_full_budget() {
        let gen = generator(MockApi::pending_forever());
        let start = Instant::now();

        let err = gen.generate("biology", request()).await.unwrap_err();

        assert!(matches!(err, AppError::PollTimeout { attempts: 100 }));
        assert_eq!(gen.api.status_calls.load(Ordering::SeqCst), 100);
        assert_eq!(start.elapsed(), Duration::from_millis(300_000));
        assert!(matches!(gen.state(), GenerationState::Failed { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn second_trigger_while_in_flight_is_a_no_op() {
        let gen = Arc::new(generator(MockApi::pending_forever()));

        let background = {
            let gen = Arc::clone(&gen);
            tokio::spawn(async move { gen.generate("biology", request()).await })
        };
        // Let the first attempt reach the polling loop.
        tokio::task::yield_now().await;
        assert_eq!(gen.api.issuer_calls.load(Ordering::SeqCst), 1);

        let err = gen.generate("biology", request()).await.unwrap_err();
        assert!(matches!(err, AppError::GenerationInFlight));
        // No second issuer call was made.
        assert_eq!(gen.api.issuer_calls.load(Ordering::SeqCst), 1);

        gen.cancel();
        let first = background.await.unwrap().unwrap_err();
        assert!(matches!(first, AppError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn acknowledge_returns_failed_machine_to_idle() {
        let gen = generator(MockApi {
            issuer_fails: true,
            ..Default::default()
        });

        let _ = gen.generate("biology", request()).await;
        assert!(matches!(gen.state(), GenerationState::Failed { .. }));

        gen.acknowledge();
        assert_eq!(gen.state(), GenerationState::Idle);

        // Acknowledging an idle machine changes nothing.
        gen.acknowledge();
        assert_eq!(gen.state(), GenerationState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn progress_is_observable_while_polling() {
        let gen = generator(MockApi {
            statuses: Mutex::new(vec![
                Ok(DeckStatus {
                    status: DeckPhase::Pending,
                    message: None,
                    data: None,
                }),
                Ok(DeckStatus {
                    status: DeckPhase::Complete,
                    message: None,
                    data: Some("a\tq".to_string()),
                }),
            ]),
            ..Default::default()
        });
        let mut progress = gen.subscribe();

        let seen = {
            let handle = tokio::spawn(async move {
                let mut names = Vec::new();
                while progress.changed().await.is_ok() {
                    let state = progress.borrow_and_update().clone();
                    let done = matches!(
                        state,
                        GenerationState::Succeeded { .. } | GenerationState::Failed { .. }
                    );
                    names.push(state.name());
                    if done {
                        break;
                    }
                }
                names
            });
            gen.generate("biology", request()).await.unwrap();
            handle.await.unwrap()
        };

        // Watch receivers may coalesce rapid updates, but the terminal state
        // is always observed.
        assert_eq!(seen.last(), Some(&"succeeded"));
    }
}
