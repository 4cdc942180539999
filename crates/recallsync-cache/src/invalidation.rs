//! Mutation-to-key fan-out
//!
//! Maps each confirmed mutation to the cache keys whose contents it may
//! have changed server-side. The fan-out is deliberately broad for review
//! grading: rescheduling one card moves it in or out of every study queue
//! and due count, and the card row itself carries updated timestamps.

use recallsync_core::domain::{CacheKey, DeckId, KeyFamily, KeySelector, Mutation};

/// Static mapping from a mutation kind to the keys it invalidates
///
/// | mutation      | invalidated                                                        |
/// |---------------|--------------------------------------------------------------------|
/// | `CreateDeck`  | `decks:list`                                                       |
/// | `UpdateDeck`  | `decks:item:{id}`, `decks:list`                                    |
/// | `DeleteDeck`  | `decks:item:{id}`, `decks:list`                                    |
/// | `CreateCard`  | `cards:list:{deckId}`, `decks:item:{deckId}`                       |
/// | `UpdateCard`  | `cards:item:{id}`, `cards:list:{deckId}` when the deck is known    |
/// | `DeleteCard`  | as `UpdateCard`                                                    |
/// | `ReviewCard`  | `study:progress:{cardId}`, all study queues, all due counts,       |
/// |               | all card lists, `decks:list`                                       |
#[derive(Debug, Default, Clone, Copy)]
pub struct InvalidationGraph;

impl InvalidationGraph {
    pub fn new() -> Self {
        Self
    }

    /// Returns the selectors to invalidate once `mutation` is confirmed
    ///
    /// Card mutations identify their deck only through the cached card;
    /// the coordinator resolves that before confirmation and passes it as
    /// `deck_hint`. When the hint is absent the per-deck card list cannot
    /// be named and is skipped; the item key still invalidates.
    pub fn fanout(&self, mutation: &Mutation, deck_hint: Option<DeckId>) -> Vec<KeySelector> {
        match mutation {
            Mutation::CreateDeck { .. } => {
                vec![KeySelector::Exact(CacheKey::DecksList)]
            }
            Mutation::UpdateDeck { id, .. } | Mutation::DeleteDeck { id } => vec![
                KeySelector::Exact(CacheKey::DeckItem(*id)),
                KeySelector::Exact(CacheKey::DecksList),
            ],
            Mutation::CreateCard { deck_id, .. } => vec![
                KeySelector::Exact(CacheKey::CardsList(*deck_id)),
                // cardsCount changed
                KeySelector::Exact(CacheKey::DeckItem(*deck_id)),
            ],
            Mutation::UpdateCard { id, .. } | Mutation::DeleteCard { id } => {
                let mut keys = vec![KeySelector::Exact(CacheKey::CardItem(*id))];
                if let Some(deck_id) = deck_hint {
                    keys.push(KeySelector::Exact(CacheKey::CardsList(deck_id)));
                }
                keys
            }
            Mutation::ReviewCard { card_id, .. } => vec![
                KeySelector::Exact(CacheKey::StudyProgress(*card_id)),
                KeySelector::Family(KeyFamily::StudyNext),
                KeySelector::Family(KeyFamily::StudyDueCount),
                KeySelector::Family(KeyFamily::CardsLists),
                KeySelector::Exact(CacheKey::DecksList),
            ],
        }
    }
}
