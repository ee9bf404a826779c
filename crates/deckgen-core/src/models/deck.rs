use serde::{Deserialize, Serialize};

/// A single generated flashcard: an (answer, question) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub answer: String,
    pub question: String,
}

/// A named collection of flashcards generated from one uploaded media file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub name: String,
    pub cards: Vec<Flashcard>,
}

const NO_ANSWER: &str = "No answer provided";
const NO_QUESTION: &str = "No question provided";

impl Deck {
    /// Parse the completed-deck payload: newline-separated records, each a
    /// tab-separated `answer<TAB>question` pair. Blank lines are skipped and
    /// missing halves get a placeholder instead of failing the whole deck.
    pub fn parse_tsv(name: impl Into<String>, payload: &str) -> Self {
        let cards = payload
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let mut parts = line.splitn(2, '\t');
                let answer = parts.next().map(str::trim).unwrap_or_default();
                let question = parts.next().map(str::trim).unwrap_or_default();
                Flashcard {
                    answer: if answer.is_empty() {
                        NO_ANSWER.to_string()
                    } else {
                        answer.to_string()
                    },
                    question: if question.is_empty() {
                        NO_QUESTION.to_string()
                    } else {
                        question.to_string()
                    },
                }
            })
            .collect();

        Deck {
            name: name.into(),
            cards,
        }
    }

    /// The flat `answer<TAB>question` export, one card per line. This is the
    /// exact shape flashcard apps accept for bulk import.
    pub fn to_tsv(&self) -> String {
        self.cards
            .iter()
            .map(|card| format!("{}\t{}", card.answer, card.question))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// A printable study sheet: `A:`/`Q:` blocks separated by blank lines.
    pub fn to_study_sheet(&self) -> String {
        self.cards
            .iter()
            .map(|card| format!("A: {}\nQ: {}\n", card.answer, card.question))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }
}
