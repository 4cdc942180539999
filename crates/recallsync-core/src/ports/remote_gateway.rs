//! Remote gateway port (driven/secondary port)
//!
//! This module defines the interface to the remote source of truth. The
//! primary implementation targets the backend REST API over HTTP, but the
//! trait makes no assumption about transport; tests substitute in-memory
//! fakes.
//!
//! ## Design Notes
//!
//! - Every method returns a typed [`GatewayError`] rather than an opaque
//!   error: callers (the mutation coordinator, the study session) match on
//!   the failure kind, so the `{kind, message}` contract is part of the
//!   port.
//! - The draft/patch structs are port-level DTOs, not domain entities; the
//!   server owns id assignment and timestamps.
//! - The spaced-repetition formula runs server-side. `review_card` is the
//!   whole contract: quality in, new schedule out.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::newtypes::{CardFace, CardId, DeckId, DeckTitle, Quality};
use crate::domain::{Card, Deck, StudyItem, StudyProgress};

// ============================================================================
// Typed failure
// ============================================================================

/// Classification of a remote failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayErrorKind {
    /// Transport-level failure: connect, DNS, timeout
    NetworkFailure,
    /// The addressed entity does not exist remotely
    NotFound,
    /// The server rejected the payload
    ValidationFailure,
    /// The write conflicts with existing state (e.g. duplicate deck title)
    ConflictFailure,
    /// Anything the client cannot classify
    Unknown,
}

impl std::fmt::Display for GatewayErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayErrorKind::NetworkFailure => write!(f, "network failure"),
            GatewayErrorKind::NotFound => write!(f, "not found"),
            GatewayErrorKind::ValidationFailure => write!(f, "validation failure"),
            GatewayErrorKind::ConflictFailure => write!(f, "conflict"),
            GatewayErrorKind::Unknown => write!(f, "unknown error"),
        }
    }
}

/// A normalized remote failure
///
/// Adapters map transport- and backend-specific failures into this shape
/// before it reaches any caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct GatewayError {
    /// Failure classification
    pub kind: GatewayErrorKind,
    /// Human-readable detail
    pub message: String,
}

impl GatewayError {
    /// Creates a new GatewayError
    pub fn new(kind: GatewayErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for a network failure
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::NetworkFailure, message)
    }

    /// Shorthand for a not-found failure
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::NotFound, message)
    }

    /// Shorthand for a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::ValidationFailure, message)
    }

    /// Shorthand for a conflict failure
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::ConflictFailure, message)
    }

    /// Shorthand for an unclassified failure
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Unknown, message)
    }
}

/// Result alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

// ============================================================================
// Port-level DTOs
// ============================================================================

/// Payload for creating a deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckDraft {
    pub title: DeckTitle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial update for a deck; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<DeckTitle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Payload for creating a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDraft {
    pub deck_id: DeckId,
    pub front: CardFace,
    pub back: CardFace,
}

/// Partial update for a card; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub front: Option<CardFace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back: Option<CardFace>,
}

// ============================================================================
// RemoteGateway trait
// ============================================================================

/// Port trait for the remote source of truth
///
/// All reads and writes against the backend go through this interface.
/// Implementations handle transport, authentication, and error
/// normalization into [`GatewayError`].
#[async_trait::async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Creates a deck and returns the server-confirmed snapshot
    async fn create_deck(&self, draft: &DeckDraft) -> GatewayResult<Deck>;

    /// Updates a deck and returns the server-confirmed snapshot
    async fn update_deck(&self, id: DeckId, patch: &DeckPatch) -> GatewayResult<Deck>;

    /// Deletes a deck
    async fn delete_deck(&self, id: DeckId) -> GatewayResult<()>;

    /// Fetches a single deck
    async fn get_deck(&self, id: DeckId) -> GatewayResult<Deck>;

    /// Fetches the full deck list
    async fn list_decks(&self) -> GatewayResult<Vec<Deck>>;

    /// Creates a card and returns the server-confirmed snapshot
    async fn create_card(&self, draft: &CardDraft) -> GatewayResult<Card>;

    /// Updates a card and returns the server-confirmed snapshot
    async fn update_card(&self, id: CardId, patch: &CardPatch) -> GatewayResult<Card>;

    /// Deletes a card
    async fn delete_card(&self, id: CardId) -> GatewayResult<()>;

    /// Fetches a single card
    async fn get_card(&self, id: CardId) -> GatewayResult<Card>;

    /// Fetches all cards in a deck
    async fn list_cards(&self, deck_id: DeckId) -> GatewayResult<Vec<Card>>;

    /// Fetches up to `limit` due items for a deck, each with its card
    /// snapshot embedded
    async fn get_next_due(&self, deck_id: DeckId, limit: u32) -> GatewayResult<Vec<StudyItem>>;

    /// Fetches the scheduling record for a card
    ///
    /// Returns `Ok(None)` for cards that have never been reviewed; that is
    /// an expected state, not a failure.
    async fn get_progress(&self, card_id: CardId) -> GatewayResult<Option<StudyProgress>>;

    /// Grades a review; the server applies the scheduling formula and
    /// returns the rescheduled record
    async fn review_card(&self, card_id: CardId, quality: Quality) -> GatewayResult<StudyProgress>;
}
