//! Study session controller
//!
//! State machine over one fetched queue of due cards:
//!
//! ```text
//! load ──► Ready ──reveal──► Reviewing ──submit ok──► Ready (next card)
//!            │                   │                        │
//!            │                   └──submit err──► Reviewing (unchanged)
//!            └────────────── queue exhausted ──► Finished
//! ```
//!
//! A failed grade leaves the current card revealed so the user can retry
//! or walk away; the controller never retries on its own. `reset` rewinds
//! over the queue already in memory and performs no I/O.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use recallsync_cache::{CacheStore, FreshnessStatus};
use recallsync_core::domain::{
    CacheKey, CachedValue, DeckId, DomainError, Mutation, Quality, StudyItem, StudyProgress,
};
use recallsync_core::ports::{GatewayError, RemoteGateway};
use recallsync_sync::MutationCoordinator;

/// Where the session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// A card is shown front-side up
    Ready,
    /// The current card's back is revealed, awaiting a grade
    Reviewing,
    /// Every card in the queue has been graded
    Finished,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::Ready => write!(f, "ready"),
            SessionPhase::Reviewing => write!(f, "reviewing"),
            SessionPhase::Finished => write!(f, "finished"),
        }
    }
}

/// Errors surfaced by session transitions
#[derive(Debug, Error)]
pub enum SessionError {
    /// The grade was rejected locally, before any mutation was issued
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The remote review call failed; the session state is unchanged
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The requested transition is not valid in the current phase
    #[error("cannot {action} while session is {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: SessionPhase,
    },
}

/// Drives one study pass over a deck's due cards
pub struct StudySessionController {
    deck_id: DeckId,
    queue: Vec<StudyItem>,
    cursor: usize,
    revealed: bool,
    store: Arc<CacheStore>,
    coordinator: Arc<MutationCoordinator>,
}

impl StudySessionController {
    /// Fetches up to `limit` due items for the deck and starts a session
    ///
    /// The fetched queue is seeded into the cache under the deck's study
    /// key so other observers see the same data. An empty queue starts
    /// the session directly in `Finished`.
    ///
    /// # Errors
    ///
    /// Returns the gateway error when the queue cannot be fetched; no
    /// session state is created in that case.
    pub async fn load(
        deck_id: DeckId,
        limit: u32,
        gateway: &dyn RemoteGateway,
        store: Arc<CacheStore>,
        coordinator: Arc<MutationCoordinator>,
    ) -> Result<Self, SessionError> {
        let queue = gateway.get_next_due(deck_id, limit).await?;
        info!(deck_id = %deck_id, cards = queue.len(), "study session loaded");
        store.set(
            &CacheKey::StudyNext(deck_id),
            CachedValue::StudyQueue(queue.clone()),
            FreshnessStatus::Fresh,
        );
        Ok(Self {
            deck_id,
            queue,
            cursor: 0,
            revealed: false,
            store,
            coordinator,
        })
    }

    /// Reveals the current card's back
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] when the card is
    /// already revealed or the queue is exhausted.
    pub fn reveal(&mut self) -> Result<(), SessionError> {
        if self.phase() != SessionPhase::Ready {
            return Err(SessionError::InvalidTransition {
                action: "reveal",
                phase: self.phase(),
            });
        }
        self.revealed = true;
        Ok(())
    }

    /// Grades the current card and advances on success
    ///
    /// The quality is validated locally first: an out-of-range grade is
    /// rejected before any mutation is issued. On a remote failure the
    /// cursor and revealed flag are left untouched, so the same card
    /// stays on screen for a retry.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Domain`] for a grade outside `0..=5`
    /// - [`SessionError::InvalidTransition`] when no card is revealed
    /// - [`SessionError::Gateway`] when the remote review fails
    pub async fn submit_quality(&mut self, quality: u8) -> Result<StudyProgress, SessionError> {
        let quality = Quality::new(quality)?;
        if self.phase() != SessionPhase::Reviewing {
            return Err(SessionError::InvalidTransition {
                action: "submit a grade",
                phase: self.phase(),
            });
        }
        let item = &self.queue[self.cursor];
        let outcome = self
            .coordinator
            .execute(Mutation::ReviewCard {
                card_id: item.card_id(),
                quality,
            })
            .await?;
        let progress = outcome
            .into_progress()
            .ok_or_else(|| GatewayError::unknown("review settled without a progress record"))?;
        // Settled: advance past the graded card
        self.cursor += 1;
        self.revealed = false;
        debug!(
            deck_id = %self.deck_id,
            graded = self.cursor,
            remaining = self.remaining(),
            "card graded"
        );
        Ok(progress)
    }

    /// Rewinds to the first card of the existing queue without refetching
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.revealed = false;
        debug!(deck_id = %self.deck_id, "session reset");
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current phase, derived from cursor and revealed flag
    pub fn phase(&self) -> SessionPhase {
        if self.cursor >= self.queue.len() {
            SessionPhase::Finished
        } else if self.revealed {
            SessionPhase::Reviewing
        } else {
            SessionPhase::Ready
        }
    }

    /// The card currently shown, if the session is not finished
    pub fn current(&self) -> Option<&StudyItem> {
        self.queue.get(self.cursor)
    }

    /// The deck this session studies
    pub fn deck_id(&self) -> DeckId {
        self.deck_id
    }

    /// Zero-based position in the queue
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// True when the current card's back is shown
    pub fn revealed(&self) -> bool {
        self.revealed
    }

    /// Cards not yet graded, including the current one
    pub fn remaining(&self) -> usize {
        self.queue.len() - self.cursor
    }

    /// Total cards fetched for this session
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// The cache store this session was created over
    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }
}
