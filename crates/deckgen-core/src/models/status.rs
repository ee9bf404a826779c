use serde::{Deserialize, Serialize};

/// Where a deck is in its remote lifecycle.
///
/// The backend reports `complete`, `error`, and a handful of in-progress
/// strings (`processing` has been observed alongside `pending`); anything the
/// client does not recognize is folded into `Pending` and polled again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeckPhase {
    Complete,
    Error,
    #[serde(other)]
    Pending,
}

/// Status payload from `GET /api/deck?deck_name=<name>`.
///
/// `data` is present only when the phase is `Complete`; it holds the deck
/// content as newline-separated, tab-separated `(answer, question)` records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckStatus {
    pub status: DeckPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl DeckStatus {
    pub fn is_complete(&self) -> bool {
        self.status == DeckPhase::Complete
    }
}
