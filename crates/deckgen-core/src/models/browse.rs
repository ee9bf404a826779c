use serde::{Deserialize, Serialize};

/// One entry in a category's deck list: a deck title plus a link to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckLink {
    pub question: Option<String>,
    pub url: Option<String>,
}

/// The deck list for one category, as returned by
/// `GET /api/decklist?category=<c>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckGroup {
    pub category: String,
    pub question_list: Vec<DeckLink>,
}
