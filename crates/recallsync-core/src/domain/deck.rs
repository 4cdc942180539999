//! Deck domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::newtypes::{DeckId, DeckTitle};

/// A deck of flashcards
///
/// Decks are owned by the remote source of truth; the client holds cached
/// snapshots and synthesizes temporary instances for optimistic creates.
/// The wire format is camelCase JSON matching the backend API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    id: DeckId,
    title: DeckTitle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Number of cards in the deck, maintained server-side
    #[serde(default)]
    cards_count: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Deck {
    /// Creates a Deck from its parts (typically deserialized server data)
    pub fn new(
        id: DeckId,
        title: DeckTitle,
        description: Option<String>,
        cards_count: u32,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            cards_count,
            created_at,
            updated_at,
        }
    }

    /// Synthesizes a local deck for an optimistic create
    ///
    /// The id is a freshly generated temporary id; the server-confirmed
    /// deck replaces this snapshot on commit.
    pub fn draft(title: DeckTitle, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: DeckId::new(),
            title,
            description,
            cards_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    // --- Getters ---

    /// Returns the deck's unique identifier
    pub fn id(&self) -> DeckId {
        self.id
    }

    /// Returns the deck title
    pub fn title(&self) -> &DeckTitle {
        &self.title
    }

    /// Returns the optional description
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the server-maintained card count
    pub fn cards_count(&self) -> u32 {
        self.cards_count
    }

    /// Returns when the deck was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the deck was last updated
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // --- Mutators (optimistic patching) ---

    /// Replaces the title and bumps `updated_at`
    pub fn set_title(&mut self, title: DeckTitle) {
        self.title = title;
        self.updated_at = Utc::now();
    }

    /// Replaces the description and bumps `updated_at`
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.updated_at = Utc::now();
    }
}
