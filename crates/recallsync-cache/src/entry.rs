//! Cache entry types
//!
//! A [`CacheEntry`] is one key's snapshot: an optional value plus freshness
//! bookkeeping. Entries never lose a previously fetched value on failure
//! (stale-if-error): the `Error` status retains the last good value.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use recallsync_core::domain::{CacheKey, CachedValue};

/// Freshness lifecycle of a cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreshnessStatus {
    /// Created but never fetched; no value yet
    Idle,
    /// A fetch (or optimistic write) is in flight
    Fetching,
    /// Value confirmed by the remote within its freshness window
    Fresh,
    /// Value present but known out of date; a refetch may be pending
    Stale,
    /// The last fetch failed; the previous good value is retained
    Error,
}

impl FreshnessStatus {
    /// Returns true if the entry holds remote-confirmed current data
    pub fn is_fresh(&self) -> bool {
        matches!(self, FreshnessStatus::Fresh)
    }

    /// Returns true if the entry is marked out of date
    pub fn is_stale(&self) -> bool {
        matches!(self, FreshnessStatus::Stale)
    }

    /// Returns true if a fetch or optimistic write is in flight
    pub fn is_fetching(&self) -> bool {
        matches!(self, FreshnessStatus::Fetching)
    }
}

impl std::fmt::Display for FreshnessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FreshnessStatus::Idle => write!(f, "idle"),
            FreshnessStatus::Fetching => write!(f, "fetching"),
            FreshnessStatus::Fresh => write!(f, "fresh"),
            FreshnessStatus::Stale => write!(f, "stale"),
            FreshnessStatus::Error => write!(f, "error"),
        }
    }
}

/// One key's cached snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    key: CacheKey,
    value: Option<CachedValue>,
    status: FreshnessStatus,
    fetched_at: Option<DateTime<Utc>>,
    stale_after: Duration,
}

impl CacheEntry {
    /// Creates an empty Idle entry for `key`
    pub fn idle(key: CacheKey, stale_after: Duration) -> Self {
        Self {
            key,
            value: None,
            status: FreshnessStatus::Idle,
            fetched_at: None,
            stale_after,
        }
    }

    // --- Getters ---

    /// Returns the entry's key
    pub fn key(&self) -> CacheKey {
        self.key
    }

    /// Returns the cached value, if any
    pub fn value(&self) -> Option<&CachedValue> {
        self.value.as_ref()
    }

    /// Returns the freshness status
    pub fn status(&self) -> FreshnessStatus {
        self.status
    }

    /// Returns when the value was last written
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Returns the freshness window
    pub fn stale_after(&self) -> Duration {
        self.stale_after
    }

    /// Returns true if a Fresh value has outlived its freshness window
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        if !self.status.is_fresh() {
            return false;
        }
        match self.fetched_at {
            Some(at) => {
                let age = now.signed_duration_since(at);
                age.to_std().map(|a| a >= self.stale_after).unwrap_or(false)
            }
            None => false,
        }
    }

    // --- Mutators (crate-internal; the store owns all entries) ---

    pub(crate) fn replace(&mut self, value: CachedValue, status: FreshnessStatus) {
        self.value = Some(value);
        self.status = status;
        self.fetched_at = Some(Utc::now());
    }

    pub(crate) fn mark_stale(&mut self) {
        self.status = FreshnessStatus::Stale;
    }

    pub(crate) fn mark_error(&mut self) {
        // Stale-if-error: the value is retained
        self.status = FreshnessStatus::Error;
    }

    pub(crate) fn apply_snapshot(&mut self, snapshot: EntrySnapshot) {
        self.value = snapshot.value;
        self.status = snapshot.status;
        self.fetched_at = snapshot.fetched_at;
    }

    /// Captures the rollback-relevant state of this entry
    pub fn snapshot(&self) -> EntrySnapshot {
        EntrySnapshot {
            value: self.value.clone(),
            status: self.status,
            fetched_at: self.fetched_at,
        }
    }
}

/// The restorable state of an entry at one instant
///
/// Captured immediately before an optimistic patch and replayed on
/// rollback. Restoring a snapshot reproduces the observable entry exactly:
/// value, status, and fetch timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct EntrySnapshot {
    pub value: Option<CachedValue>,
    pub status: FreshnessStatus,
    pub fetched_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use recallsync_core::domain::CachedValue;

    fn entry() -> CacheEntry {
        CacheEntry::idle(CacheKey::DecksList, Duration::from_secs(30))
    }

    #[test]
    fn test_idle_entry_is_empty() {
        let entry = entry();
        assert_eq!(entry.status(), FreshnessStatus::Idle);
        assert!(entry.value().is_none());
        assert!(entry.fetched_at().is_none());
    }

    #[test]
    fn test_replace_stamps_fetched_at() {
        let mut entry = entry();
        entry.replace(CachedValue::Decks(Vec::new()), FreshnessStatus::Fresh);
        assert!(entry.fetched_at().is_some());
        assert!(entry.status().is_fresh());
    }

    #[test]
    fn test_mark_error_retains_value() {
        let mut entry = entry();
        entry.replace(CachedValue::DueCount(5), FreshnessStatus::Fresh);
        entry.mark_error();
        assert_eq!(entry.status(), FreshnessStatus::Error);
        assert_eq!(entry.value().and_then(CachedValue::as_due_count), Some(5));
    }

    #[test]
    fn test_is_expired_only_for_fresh() {
        let mut entry = entry();
        entry.replace(CachedValue::DueCount(1), FreshnessStatus::Fresh);
        let later = Utc::now() + ChronoDuration::seconds(60);
        assert!(entry.is_expired(later));

        entry.mark_stale();
        assert!(!entry.is_expired(later));
    }

    #[test]
    fn test_fresh_within_window_not_expired() {
        let mut entry = entry();
        entry.replace(CachedValue::DueCount(1), FreshnessStatus::Fresh);
        assert!(!entry.is_expired(Utc::now()));
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut entry = entry();
        entry.replace(CachedValue::DueCount(7), FreshnessStatus::Fresh);
        let snapshot = entry.snapshot();

        entry.replace(CachedValue::DueCount(9), FreshnessStatus::Fetching);
        entry.apply_snapshot(snapshot);

        assert_eq!(entry.value().and_then(CachedValue::as_due_count), Some(7));
        assert!(entry.status().is_fresh());
    }
}
