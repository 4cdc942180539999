//! Cache key namespace
//!
//! Every cacheable collection or snapshot is addressed by a [`CacheKey`].
//! The string rendering is stable and shared between the cache, the
//! invalidation table, tests, and UI code:
//!
//! ```text
//! decks:list
//! decks:item:{id}
//! cards:list:{deckId}
//! cards:item:{id}
//! study:next:{deckId}
//! study:progress:{cardId}
//! study:dueCount:{deckId}
//! ```

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::newtypes::{CardId, DeckId};

/// Address of one cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheKey {
    /// The list of all decks
    DecksList,
    /// A single deck snapshot
    DeckItem(DeckId),
    /// The list of cards in one deck
    CardsList(DeckId),
    /// A single card snapshot
    CardItem(CardId),
    /// The materialized due-item queue for one deck
    StudyNext(DeckId),
    /// The scheduling record for one card
    StudyProgress(CardId),
    /// The due-item count for one deck
    StudyDueCount(DeckId),
}

impl CacheKey {
    /// Returns the family this key belongs to
    pub fn family(&self) -> KeyFamily {
        match self {
            CacheKey::DecksList => KeyFamily::DecksList,
            CacheKey::DeckItem(_) => KeyFamily::DeckItems,
            CacheKey::CardsList(_) => KeyFamily::CardsLists,
            CacheKey::CardItem(_) => KeyFamily::CardItems,
            CacheKey::StudyNext(_) => KeyFamily::StudyNext,
            CacheKey::StudyProgress(_) => KeyFamily::StudyProgress,
            CacheKey::StudyDueCount(_) => KeyFamily::StudyDueCount,
        }
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::DecksList => write!(f, "decks:list"),
            CacheKey::DeckItem(id) => write!(f, "decks:item:{id}"),
            CacheKey::CardsList(id) => write!(f, "cards:list:{id}"),
            CacheKey::CardItem(id) => write!(f, "cards:item:{id}"),
            CacheKey::StudyNext(id) => write!(f, "study:next:{id}"),
            CacheKey::StudyProgress(id) => write!(f, "study:progress:{id}"),
            CacheKey::StudyDueCount(id) => write!(f, "study:dueCount:{id}"),
        }
    }
}

impl FromStr for CacheKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidCacheKey(s.to_string());

        if s == "decks:list" {
            return Ok(CacheKey::DecksList);
        }
        let (prefix, id) = s.rsplit_once(':').ok_or_else(invalid)?;
        match prefix {
            "decks:item" => id.parse().map(CacheKey::DeckItem).map_err(|_| invalid()),
            "cards:list" => id.parse().map(CacheKey::CardsList).map_err(|_| invalid()),
            "cards:item" => id.parse().map(CacheKey::CardItem).map_err(|_| invalid()),
            "study:next" => id.parse().map(CacheKey::StudyNext).map_err(|_| invalid()),
            "study:progress" => id
                .parse()
                .map(CacheKey::StudyProgress)
                .map_err(|_| invalid()),
            "study:dueCount" => id
                .parse()
                .map(CacheKey::StudyDueCount)
                .map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }
}

/// A family of cache keys sharing one prefix
///
/// Families are the unit of wildcard invalidation (e.g. `study:next:*`)
/// and of freshness-window configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyFamily {
    DecksList,
    DeckItems,
    CardsLists,
    CardItems,
    StudyNext,
    StudyProgress,
    StudyDueCount,
}

impl Display for KeyFamily {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            KeyFamily::DecksList => write!(f, "decks:list"),
            KeyFamily::DeckItems => write!(f, "decks:item:*"),
            KeyFamily::CardsLists => write!(f, "cards:list:*"),
            KeyFamily::CardItems => write!(f, "cards:item:*"),
            KeyFamily::StudyNext => write!(f, "study:next:*"),
            KeyFamily::StudyProgress => write!(f, "study:progress:*"),
            KeyFamily::StudyDueCount => write!(f, "study:dueCount:*"),
        }
    }
}

/// Selects either one exact key or a whole family
///
/// The invalidation table produces selectors; the cache store resolves them
/// against its live entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySelector {
    /// One exact key
    Exact(CacheKey),
    /// Every key in a family
    Family(KeyFamily),
}

impl KeySelector {
    /// Returns true if `key` is selected
    pub fn matches(&self, key: &CacheKey) -> bool {
        match self {
            KeySelector::Exact(exact) => exact == key,
            KeySelector::Family(family) => key.family() == *family,
        }
    }
}

impl Display for KeySelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            KeySelector::Exact(key) => write!(f, "{key}"),
            KeySelector::Family(family) => write!(f, "{family}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck_id() -> DeckId {
        "550e8400-e29b-41d4-a716-446655440000".parse().unwrap()
    }

    fn card_id() -> CardId {
        "550e8400-e29b-41d4-a716-446655440001".parse().unwrap()
    }

    mod display_tests {
        use super::*;

        #[test]
        fn test_stable_namespace_strings() {
            assert_eq!(CacheKey::DecksList.to_string(), "decks:list");
            assert_eq!(
                CacheKey::DeckItem(deck_id()).to_string(),
                "decks:item:550e8400-e29b-41d4-a716-446655440000"
            );
            assert_eq!(
                CacheKey::CardsList(deck_id()).to_string(),
                "cards:list:550e8400-e29b-41d4-a716-446655440000"
            );
            assert_eq!(
                CacheKey::CardItem(card_id()).to_string(),
                "cards:item:550e8400-e29b-41d4-a716-446655440001"
            );
            assert_eq!(
                CacheKey::StudyNext(deck_id()).to_string(),
                "study:next:550e8400-e29b-41d4-a716-446655440000"
            );
            assert_eq!(
                CacheKey::StudyProgress(card_id()).to_string(),
                "study:progress:550e8400-e29b-41d4-a716-446655440001"
            );
            assert_eq!(
                CacheKey::StudyDueCount(deck_id()).to_string(),
                "study:dueCount:550e8400-e29b-41d4-a716-446655440000"
            );
        }
    }

    mod from_str_tests {
        use super::*;

        #[test]
        fn test_roundtrip_all_variants() {
            let keys = [
                CacheKey::DecksList,
                CacheKey::DeckItem(deck_id()),
                CacheKey::CardsList(deck_id()),
                CacheKey::CardItem(card_id()),
                CacheKey::StudyNext(deck_id()),
                CacheKey::StudyProgress(card_id()),
                CacheKey::StudyDueCount(deck_id()),
            ];
            for key in keys {
                let parsed: CacheKey = key.to_string().parse().unwrap();
                assert_eq!(parsed, key);
            }
        }

        #[test]
        fn test_unknown_prefix_fails() {
            let result: Result<CacheKey, _> = "widgets:list:abc".parse();
            assert!(result.is_err());
        }

        #[test]
        fn test_bad_id_fails() {
            let result: Result<CacheKey, _> = "decks:item:not-a-uuid".parse();
            assert!(result.is_err());
        }
    }

    mod selector_tests {
        use super::*;

        #[test]
        fn test_exact_matches_only_itself() {
            let selector = KeySelector::Exact(CacheKey::DeckItem(deck_id()));
            assert!(selector.matches(&CacheKey::DeckItem(deck_id())));
            assert!(!selector.matches(&CacheKey::DeckItem(DeckId::new())));
            assert!(!selector.matches(&CacheKey::DecksList));
        }

        #[test]
        fn test_family_matches_every_member() {
            let selector = KeySelector::Family(KeyFamily::StudyNext);
            assert!(selector.matches(&CacheKey::StudyNext(deck_id())));
            assert!(selector.matches(&CacheKey::StudyNext(DeckId::new())));
            assert!(!selector.matches(&CacheKey::StudyDueCount(deck_id())));
        }

        #[test]
        fn test_key_family_mapping() {
            assert_eq!(CacheKey::DecksList.family(), KeyFamily::DecksList);
            assert_eq!(CacheKey::CardsList(deck_id()).family(), KeyFamily::CardsLists);
            assert_eq!(
                CacheKey::StudyProgress(card_id()).family(),
                KeyFamily::StudyProgress
            );
        }
    }
}
