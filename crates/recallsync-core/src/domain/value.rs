//! Cached value union
//!
//! [`CachedValue`] is the typed union of every shape the cache can hold.
//! Each [`CacheKey`](super::CacheKey) variant maps to exactly one variant
//! here; the accessors return `None` on a mismatch rather than panicking so
//! callers can treat a shape mismatch as a cache miss.

use serde::{Deserialize, Serialize};

use super::card::Card;
use super::deck::Deck;
use super::progress::{StudyItem, StudyProgress};

/// A value held by one cache entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CachedValue {
    /// `decks:item:{id}`
    Deck(Deck),
    /// `decks:list`
    Decks(Vec<Deck>),
    /// `cards:item:{id}`
    Card(Card),
    /// `cards:list:{deckId}`
    Cards(Vec<Card>),
    /// `study:progress:{cardId}` (None for never-reviewed cards)
    Progress(Option<StudyProgress>),
    /// `study:next:{deckId}`
    StudyQueue(Vec<StudyItem>),
    /// `study:dueCount:{deckId}`
    DueCount(u64),
}

impl CachedValue {
    /// Returns the deck snapshot, if this value is one
    pub fn as_deck(&self) -> Option<&Deck> {
        match self {
            CachedValue::Deck(deck) => Some(deck),
            _ => None,
        }
    }

    /// Returns the deck list, if this value is one
    pub fn as_decks(&self) -> Option<&[Deck]> {
        match self {
            CachedValue::Decks(decks) => Some(decks),
            _ => None,
        }
    }

    /// Returns the card snapshot, if this value is one
    pub fn as_card(&self) -> Option<&Card> {
        match self {
            CachedValue::Card(card) => Some(card),
            _ => None,
        }
    }

    /// Returns the card list, if this value is one
    pub fn as_cards(&self) -> Option<&[Card]> {
        match self {
            CachedValue::Cards(cards) => Some(cards),
            _ => None,
        }
    }

    /// Returns the progress record, if this value is one
    pub fn as_progress(&self) -> Option<&StudyProgress> {
        match self {
            CachedValue::Progress(progress) => progress.as_ref(),
            _ => None,
        }
    }

    /// Returns the due-item queue, if this value is one
    pub fn as_study_queue(&self) -> Option<&[StudyItem]> {
        match self {
            CachedValue::StudyQueue(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the due count, if this value is one
    pub fn as_due_count(&self) -> Option<u64> {
        match self {
            CachedValue::DueCount(count) => Some(*count),
            _ => None,
        }
    }
}

impl From<Deck> for CachedValue {
    fn from(deck: Deck) -> Self {
        CachedValue::Deck(deck)
    }
}

impl From<Vec<Deck>> for CachedValue {
    fn from(decks: Vec<Deck>) -> Self {
        CachedValue::Decks(decks)
    }
}

impl From<Card> for CachedValue {
    fn from(card: Card) -> Self {
        CachedValue::Card(card)
    }
}

impl From<Vec<Card>> for CachedValue {
    fn from(cards: Vec<Card>) -> Self {
        CachedValue::Cards(cards)
    }
}

impl From<Vec<StudyItem>> for CachedValue {
    fn from(items: Vec<StudyItem>) -> Self {
        CachedValue::StudyQueue(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::newtypes::{CardFace, DeckId, DeckTitle};

    fn sample_card() -> Card {
        Card::draft(
            DeckId::new(),
            CardFace::new("q".to_string()).unwrap(),
            CardFace::new("a".to_string()).unwrap(),
        )
    }

    #[test]
    fn test_accessors_match_variant() {
        let card = sample_card();
        let value = CachedValue::Card(card.clone());

        assert_eq!(value.as_card(), Some(&card));
        assert!(value.as_cards().is_none());
        assert!(value.as_deck().is_none());
        assert!(value.as_due_count().is_none());
    }

    #[test]
    fn test_due_count() {
        let value = CachedValue::DueCount(12);
        assert_eq!(value.as_due_count(), Some(12));
    }

    #[test]
    fn test_absent_progress_is_not_a_mismatch() {
        let value = CachedValue::Progress(None);
        assert!(value.as_progress().is_none());
        // Still the Progress variant, so lists stay None too
        assert!(value.as_cards().is_none());
    }

    #[test]
    fn test_from_conversions() {
        let deck = Deck::draft(DeckTitle::new("t".to_string()).unwrap(), None);
        let value: CachedValue = deck.clone().into();
        assert_eq!(value.as_deck(), Some(&deck));

        let value: CachedValue = vec![sample_card()].into();
        assert_eq!(value.as_cards().map(<[Card]>::len), Some(1));
    }
}
