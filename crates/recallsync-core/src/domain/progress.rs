//! Study progress and due-item types
//!
//! `StudyProgress` is the per-card scheduling record maintained by the
//! server-side spaced-repetition algorithm. The client treats the scheduling
//! fields (`ease_factor`, `interval`, `repetition`, `due_date`) as opaque
//! output of the "quality in, new schedule out" contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::card::Card;
use super::newtypes::{CardId, ProgressId};

/// Spaced-repetition scheduling record for one card (one-to-one)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyProgress {
    id: ProgressId,
    card_id: CardId,
    ease_factor: f64,
    /// Current inter-review interval in days
    interval: u32,
    /// Consecutive successful repetitions
    repetition: u32,
    due_date: DateTime<Utc>,
    review_count: u32,
    #[serde(default)]
    last_reviewed: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StudyProgress {
    /// Creates a StudyProgress from its parts (typically deserialized server data)
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ProgressId,
        card_id: CardId,
        ease_factor: f64,
        interval: u32,
        repetition: u32,
        due_date: DateTime<Utc>,
        review_count: u32,
        last_reviewed: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            card_id,
            ease_factor,
            interval,
            repetition,
            due_date,
            review_count,
            last_reviewed,
            created_at,
            updated_at,
        }
    }

    // --- Getters ---

    /// Returns the record's unique identifier
    pub fn id(&self) -> ProgressId {
        self.id
    }

    /// Returns the card this record schedules
    pub fn card_id(&self) -> CardId {
        self.card_id
    }

    /// Returns the current ease factor
    pub fn ease_factor(&self) -> f64 {
        self.ease_factor
    }

    /// Returns the current interval in days
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Returns the consecutive repetition count
    pub fn repetition(&self) -> u32 {
        self.repetition
    }

    /// Returns when the card is next due
    pub fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    /// Returns the lifetime review count
    pub fn review_count(&self) -> u32 {
        self.review_count
    }

    /// Returns when the card was last reviewed, if ever
    pub fn last_reviewed(&self) -> Option<DateTime<Utc>> {
        self.last_reviewed
    }

    /// Returns when the record was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the record was last updated
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // --- Computed / mutators ---

    /// Returns true if the card is due at `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_date <= now
    }

    /// Optimistically stamps `last_reviewed`
    ///
    /// The scheduling fields are left untouched; they are only known once
    /// the server confirms the review.
    pub fn touch_reviewed(&mut self, at: DateTime<Utc>) {
        self.last_reviewed = Some(at);
        self.updated_at = at;
    }
}

/// A due item: a progress record joined with its card snapshot
///
/// Materialized by the remote collaborator (`get_next_due`); the embedded
/// card is a read-only snapshot, not independently owned by the cache.
/// On the wire the progress fields are flattened alongside a `card` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyItem {
    #[serde(flatten)]
    progress: StudyProgress,
    card: Card,
}

impl StudyItem {
    /// Creates a StudyItem from a progress record and its card snapshot
    pub fn new(progress: StudyProgress, card: Card) -> Self {
        Self { progress, card }
    }

    /// Returns the scheduling record
    pub fn progress(&self) -> &StudyProgress {
        &self.progress
    }

    /// Returns the embedded card snapshot
    pub fn card(&self) -> &Card {
        &self.card
    }

    /// Returns the reviewed card's identifier
    pub fn card_id(&self) -> CardId {
        self.progress.card_id()
    }
}
