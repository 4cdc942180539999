//! Card domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::newtypes::{CardFace, CardId, DeckId};

/// A flashcard with a front (prompt) and back (answer)
///
/// Many cards belong to one deck. Like [`Deck`](super::Deck), card snapshots
/// are cached locally and synthesized for optimistic creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    id: CardId,
    deck_id: DeckId,
    front: CardFace,
    back: CardFace,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Card {
    /// Creates a Card from its parts (typically deserialized server data)
    pub fn new(
        id: CardId,
        deck_id: DeckId,
        front: CardFace,
        back: CardFace,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            deck_id,
            front,
            back,
            created_at,
            updated_at,
        }
    }

    /// Synthesizes a local card with a temporary id for an optimistic create
    pub fn draft(deck_id: DeckId, front: CardFace, back: CardFace) -> Self {
        let now = Utc::now();
        Self {
            id: CardId::new(),
            deck_id,
            front,
            back,
            created_at: now,
            updated_at: now,
        }
    }

    // --- Getters ---

    /// Returns the card's unique identifier
    pub fn id(&self) -> CardId {
        self.id
    }

    /// Returns the owning deck's identifier
    pub fn deck_id(&self) -> DeckId {
        self.deck_id
    }

    /// Returns the front (prompt) text
    pub fn front(&self) -> &CardFace {
        &self.front
    }

    /// Returns the back (answer) text
    pub fn back(&self) -> &CardFace {
        &self.back
    }

    /// Returns when the card was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the card was last updated
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // --- Mutators (optimistic patching) ---

    /// Replaces the front text and bumps `updated_at`
    pub fn set_front(&mut self, front: CardFace) {
        self.front = front;
        self.updated_at = Utc::now();
    }

    /// Replaces the back text and bumps `updated_at`
    pub fn set_back(&mut self, back: CardFace) {
        self.back = back;
        self.updated_at = Utc::now();
    }
}
