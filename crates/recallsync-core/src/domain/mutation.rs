//! Mutation vocabulary
//!
//! A [`Mutation`] is one user-initiated write against the remote source of
//! truth. The coordinator executes mutations optimistically; the
//! invalidation table maps each settled mutation to the key families it
//! makes stale.

use std::fmt::{self, Display, Formatter};

use super::newtypes::{CardFace, CardId, DeckId, DeckTitle, Quality};

/// A user-initiated write
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Create a new deck
    CreateDeck {
        title: DeckTitle,
        description: Option<String>,
    },
    /// Update an existing deck's title and/or description
    UpdateDeck {
        id: DeckId,
        title: Option<DeckTitle>,
        description: Option<String>,
    },
    /// Delete a deck (and, server-side, its cards)
    DeleteDeck { id: DeckId },
    /// Create a new card in a deck
    CreateCard {
        deck_id: DeckId,
        front: CardFace,
        back: CardFace,
    },
    /// Update an existing card's faces
    UpdateCard {
        id: CardId,
        front: Option<CardFace>,
        back: Option<CardFace>,
    },
    /// Delete a card
    DeleteCard { id: CardId },
    /// Grade a card review; the server reschedules the card
    ReviewCard { card_id: CardId, quality: Quality },
}

impl Mutation {
    /// Returns a short kind name for logging
    pub fn kind_name(&self) -> &'static str {
        match self {
            Mutation::CreateDeck { .. } => "create_deck",
            Mutation::UpdateDeck { .. } => "update_deck",
            Mutation::DeleteDeck { .. } => "delete_deck",
            Mutation::CreateCard { .. } => "create_card",
            Mutation::UpdateCard { .. } => "update_card",
            Mutation::DeleteCard { .. } => "delete_card",
            Mutation::ReviewCard { .. } => "review_card",
        }
    }

    /// Returns the card targeted by this mutation, if it addresses one
    pub fn target_card(&self) -> Option<CardId> {
        match self {
            Mutation::UpdateCard { id, .. } | Mutation::DeleteCard { id } => Some(*id),
            Mutation::ReviewCard { card_id, .. } => Some(*card_id),
            _ => None,
        }
    }

    /// Returns the deck targeted by this mutation, when known from the
    /// payload alone (card mutations resolve their deck from the cache)
    pub fn target_deck(&self) -> Option<DeckId> {
        match self {
            Mutation::UpdateDeck { id, .. } | Mutation::DeleteDeck { id } => Some(*id),
            Mutation::CreateCard { deck_id, .. } => Some(*deck_id),
            _ => None,
        }
    }
}

impl Display for Mutation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::CreateDeck { title, .. } => write!(f, "create_deck({title})"),
            Mutation::UpdateDeck { id, .. } => write!(f, "update_deck({id})"),
            Mutation::DeleteDeck { id } => write!(f, "delete_deck({id})"),
            Mutation::CreateCard { deck_id, .. } => write!(f, "create_card(deck={deck_id})"),
            Mutation::UpdateCard { id, .. } => write!(f, "update_card({id})"),
            Mutation::DeleteCard { id } => write!(f, "delete_card({id})"),
            Mutation::ReviewCard { card_id, quality } => {
                write!(f, "review_card({card_id}, q={quality})")
            }
        }
    }
}
