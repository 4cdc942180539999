//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for domain identifiers and
//! values. Each newtype ensures data validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

// ============================================================================
// UUID-based ID types
// ============================================================================

/// Identifier for Deck entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckId(Uuid);

impl DeckId {
    /// Create a new random DeckId
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a DeckId from an existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID value
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Create a nil (all zeros) DeckId
    #[must_use]
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for DeckId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for DeckId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DeckId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| DomainError::InvalidId(format!("Invalid DeckId: {e}")))
    }
}

impl From<Uuid> for DeckId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Identifier for Card entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(Uuid);

impl CardId {
    /// Create a new random CardId
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a CardId from an existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID value
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Create a nil (all zeros) CardId
    #[must_use]
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CardId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| DomainError::InvalidId(format!("Invalid CardId: {e}")))
    }
}

impl From<Uuid> for CardId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Identifier for StudyProgress records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressId(Uuid);

impl ProgressId {
    /// Create a new random ProgressId
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a ProgressId from an existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID value
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Create a nil (all zeros) ProgressId
    #[must_use]
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for ProgressId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ProgressId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProgressId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| DomainError::InvalidId(format!("Invalid ProgressId: {e}")))
    }
}

impl From<Uuid> for ProgressId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Identifier for in-flight mutations (snapshot stack frames)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MutationId(Uuid);

impl MutationId {
    /// Create a new random MutationId
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a MutationId from an existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID value
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MutationId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for MutationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MutationId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| DomainError::InvalidId(format!("Invalid MutationId: {e}")))
    }
}

// ============================================================================
// Quality score
// ============================================================================

/// Review quality on the 0..=5 recall scale
///
/// `0` means no recall at all, `5` means perfect recall. This is the entire
/// interface to the server-side scheduling algorithm; the client never
/// interprets the value further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    /// Lowest grade: no recall
    pub const MIN: u8 = 0;
    /// Highest grade: perfect recall
    pub const MAX: u8 = 5;

    /// Create a new Quality, validating the 0..=5 range
    ///
    /// # Errors
    /// Returns `DomainError::QualityOutOfRange` for values above 5
    pub fn new(value: u8) -> Result<Self, DomainError> {
        if value > Self::MAX {
            return Err(DomainError::QualityOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Get the inner grade value
    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }
}

impl Display for Quality {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Quality {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

// ============================================================================
// Validated text types
// ============================================================================

/// Validated deck title (1..=200 characters)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeckTitle(String);

impl DeckTitle {
    /// Maximum title length in characters
    pub const MAX_LEN: usize = 200;

    /// Create a new DeckTitle
    ///
    /// # Errors
    /// Returns error if the title is empty or longer than 200 characters
    pub fn new(title: String) -> Result<Self, DomainError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidTitle(
                "Title cannot be empty".to_string(),
            ));
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(DomainError::InvalidTitle(format!(
                "Title exceeds {} characters",
                Self::MAX_LEN
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DeckTitle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DeckTitle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for DeckTitle {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<DeckTitle> for String {
    fn from(title: DeckTitle) -> Self {
        title.0
    }
}

/// Validated card face text (front or back, 1..=5000 characters)
///
/// Card faces carry lightweight markup rendered by the UI layer; the domain
/// treats the content as opaque text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardFace(String);

impl CardFace {
    /// Maximum face length in characters
    pub const MAX_LEN: usize = 5000;

    /// Create a new CardFace
    ///
    /// # Errors
    /// Returns error if the text is empty or longer than 5000 characters
    pub fn new(text: String) -> Result<Self, DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::InvalidCardFace(
                "Card face cannot be empty".to_string(),
            ));
        }
        if text.chars().count() > Self::MAX_LEN {
            return Err(DomainError::InvalidCardFace(format!(
                "Card face exceeds {} characters",
                Self::MAX_LEN
            )));
        }
        Ok(Self(text))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CardFace {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CardFace {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for CardFace {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CardFace> for String {
    fn from(face: CardFace) -> Self {
        face.0
    }
}

// ============================================================================
// Tests
// ============================================================================
