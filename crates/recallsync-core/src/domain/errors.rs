//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! including validation failures and invalid state transitions.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid identifier format
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Review quality outside the 0..=5 scale
    #[error("Quality must be between 0 and 5, got {0}")]
    QualityOutOfRange(u8),

    /// Deck title failed validation (empty or too long)
    #[error("Invalid deck title: {0}")]
    InvalidTitle(String),

    /// Deck description exceeds the allowed length
    #[error("Invalid deck description: {0}")]
    InvalidDescription(String),

    /// Card front/back text failed validation (empty or too long)
    #[error("Invalid card face: {0}")]
    InvalidCardFace(String),

    /// Cache key string did not match the key namespace
    #[error("Invalid cache key: {0}")]
    InvalidCacheKey(String),

    /// Invalid state transition attempt
    #[error("Invalid state transition from {from} to {to}")]
    InvalidState {
        /// The current state
        from: String,
        /// The attempted target state
        to: String,
    },

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}
