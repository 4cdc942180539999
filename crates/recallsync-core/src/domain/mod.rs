//! Domain entities and business logic
//!
//! This module contains the core domain types for recallsync:
//! - Newtypes for type-safe identifiers and validated domain types
//! - Deck, card, and study-progress entities
//! - The cache key namespace and cached value union
//! - The mutation vocabulary consumed by the coordinator
//! - Domain-specific error types

pub mod cache_key;
pub mod card;
pub mod deck;
pub mod errors;
pub mod mutation;
pub mod newtypes;
pub mod progress;
pub mod value;

// Re-export commonly used types
pub use cache_key::{CacheKey, KeyFamily, KeySelector};
pub use card::Card;
pub use deck::Deck;
pub use errors::DomainError;
pub use mutation::Mutation;
pub use newtypes::*;
pub use progress::{StudyItem, StudyProgress};
pub use value::CachedValue;
