//! Domain models shared across deckgen components.

pub mod browse;
pub mod deck;
pub mod status;
pub mod upload;

pub use browse::{DeckGroup, DeckLink};
pub use deck::{Deck, Flashcard};
pub use status::{DeckPhase, DeckStatus};
pub use upload::{PresignedUpload, UploadRequest, UploadUrlRequest};
