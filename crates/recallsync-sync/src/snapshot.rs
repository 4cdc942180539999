//! Per-key pending-mutation snapshot stacks
//!
//! Every in-flight mutation pushes one frame per cache key it touches,
//! capturing the entry's state at that instant. Because mutations on the
//! same key may settle out of order, settlement distinguishes two cases:
//!
//! - **Topmost frame**: this mutation's optimistic value is live in the
//!   store, so the caller writes the settlement result there (confirmed
//!   value on commit, captured snapshot on rollback).
//! - **Buried frame**: a later mutation has patched on top, and its
//!   optimistic value must not be clobbered. The settled frame is spliced
//!   out and its result folded into the snapshot of the frame above, so
//!   that a later rollback of *that* mutation restores the correct state.
//!
//! The stacks are a plain data structure with no I/O; the coordinator owns
//! the only instance and serializes access.

use std::collections::HashMap;

use recallsync_cache::EntrySnapshot;
use recallsync_core::domain::{CacheKey, CachedValue, MutationId};

/// One in-flight mutation's captured state for one key
#[derive(Debug, Clone)]
pub struct PendingFrame {
    id: MutationId,
    snapshot: EntrySnapshot,
}

impl PendingFrame {
    /// The owning mutation's id
    pub fn id(&self) -> MutationId {
        self.id
    }

    /// The entry state captured when the mutation began
    pub fn snapshot(&self) -> &EntrySnapshot {
        &self.snapshot
    }
}

/// Where a settled frame's result landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// The frame was topmost; the caller must update the store
    Topmost,
    /// The frame was buried; its result was folded into the frame above
    /// and the store is untouched
    Folded,
}

/// Snapshot stacks for every key with at least one pending mutation
#[derive(Debug, Default)]
pub struct SnapshotStacks {
    stacks: HashMap<CacheKey, Vec<PendingFrame>>,
}

impl SnapshotStacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a pending frame for `id` onto `key`'s stack
    pub fn push(&mut self, key: CacheKey, id: MutationId, snapshot: EntrySnapshot) {
        self.stacks
            .entry(key)
            .or_default()
            .push(PendingFrame { id, snapshot });
    }

    /// Number of pending frames on `key`'s stack
    pub fn depth(&self, key: &CacheKey) -> usize {
        self.stacks.get(key).map_or(0, Vec::len)
    }

    /// True when no mutation is in flight on any key
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// Settles `id`'s frame on `key` as committed
    ///
    /// `confirm` maps a pre-settlement value to the server-confirmed one
    /// (e.g. swapping a temporary id for the server id). For a topmost
    /// frame the caller applies the same mapping to the live entry; for a
    /// buried frame it is applied here, to the snapshot of the frame above.
    pub fn commit(
        &mut self,
        key: &CacheKey,
        id: MutationId,
        confirm: impl Fn(Option<CachedValue>) -> Option<CachedValue>,
    ) -> Settled {
        let Some(index) = self.position(key, id) else {
            return Settled::Topmost;
        };
        let frames = self.stacks.get_mut(key).expect("stack exists");
        frames.remove(index);
        let settled = if index == frames.len() {
            Settled::Topmost
        } else {
            let above = &mut frames[index];
            above.snapshot.value = confirm(above.snapshot.value.take());
            Settled::Folded
        };
        if frames.is_empty() {
            self.stacks.remove(key);
        }
        settled
    }

    /// Settles `id`'s frame on `key` as rolled back
    ///
    /// Returns the snapshot the caller must restore to the store when the
    /// frame was topmost, or `None` when it was buried (the captured
    /// snapshot was folded into the frame above instead).
    pub fn rollback(&mut self, key: &CacheKey, id: MutationId) -> Option<EntrySnapshot> {
        let index = self.position(key, id)?;
        let frames = self.stacks.get_mut(key).expect("stack exists");
        let frame = frames.remove(index);
        let restore = if index == frames.len() {
            Some(frame.snapshot)
        } else {
            frames[index].snapshot = frame.snapshot;
            None
        };
        if frames.is_empty() {
            self.stacks.remove(key);
        }
        restore
    }

    fn position(&self, key: &CacheKey, id: MutationId) -> Option<usize> {
        self.stacks
            .get(key)?
            .iter()
            .position(|frame| frame.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recallsync_cache::FreshnessStatus;

    fn snapshot(count: u64) -> EntrySnapshot {
        EntrySnapshot {
            value: Some(CachedValue::DueCount(count)),
            status: FreshnessStatus::Fresh,
            fetched_at: None,
        }
    }

    #[test]
    fn test_topmost_rollback_returns_captured_snapshot() {
        let mut stacks = SnapshotStacks::new();
        let id = MutationId::new();
        stacks.push(CacheKey::DecksList, id, snapshot(1));

        let restore = stacks.rollback(&CacheKey::DecksList, id);
        assert_eq!(restore, Some(snapshot(1)));
        assert!(stacks.is_empty());
    }

    #[test]
    fn test_topmost_commit_tells_caller_to_write() {
        let mut stacks = SnapshotStacks::new();
        let id = MutationId::new();
        stacks.push(CacheKey::DecksList, id, snapshot(1));

        let settled = stacks.commit(&CacheKey::DecksList, id, |v| v);
        assert_eq!(settled, Settled::Topmost);
        assert!(stacks.is_empty());
    }

    #[test]
    fn test_buried_rollback_folds_into_frame_above() {
        let mut stacks = SnapshotStacks::new();
        let first = MutationId::new();
        let second = MutationId::new();
        stacks.push(CacheKey::DecksList, first, snapshot(1));
        // Second mutation captured the first's optimistic value
        stacks.push(CacheKey::DecksList, second, snapshot(2));

        // First settles while buried: no store write, but the second's
        // restore point becomes the first's captured snapshot
        let restore = stacks.rollback(&CacheKey::DecksList, first);
        assert_eq!(restore, None);
        assert_eq!(stacks.depth(&CacheKey::DecksList), 1);

        let restore = stacks.rollback(&CacheKey::DecksList, second);
        assert_eq!(restore, Some(snapshot(1)));
    }

    #[test]
    fn test_buried_commit_folds_confirmed_value() {
        let mut stacks = SnapshotStacks::new();
        let first = MutationId::new();
        let second = MutationId::new();
        stacks.push(CacheKey::DecksList, first, snapshot(1));
        stacks.push(CacheKey::DecksList, second, snapshot(2));

        let settled = stacks.commit(&CacheKey::DecksList, first, |_| {
            Some(CachedValue::DueCount(10))
        });
        assert_eq!(settled, Settled::Folded);

        // If the second now fails, it restores the first's confirmed value
        let restore = stacks.rollback(&CacheKey::DecksList, second);
        assert_eq!(
            restore.and_then(|s| s.value),
            Some(CachedValue::DueCount(10))
        );
    }

    #[test]
    fn test_later_mutation_settling_first_is_topmost() {
        let mut stacks = SnapshotStacks::new();
        let first = MutationId::new();
        let second = MutationId::new();
        stacks.push(CacheKey::DecksList, first, snapshot(1));
        stacks.push(CacheKey::DecksList, second, snapshot(2));

        // The delete-fails-before-update-settles race: the later frame is
        // topmost, so its rollback restores the earlier optimistic value
        let restore = stacks.rollback(&CacheKey::DecksList, second);
        assert_eq!(restore, Some(snapshot(2)));
        assert_eq!(stacks.depth(&CacheKey::DecksList), 1);
    }

    #[test]
    fn test_stacks_are_per_key() {
        let mut stacks = SnapshotStacks::new();
        let id = MutationId::new();
        stacks.push(CacheKey::DecksList, id, snapshot(1));

        let deck_id = recallsync_core::domain::DeckId::new();
        assert_eq!(stacks.depth(&CacheKey::CardsList(deck_id)), 0);
        assert_eq!(stacks.depth(&CacheKey::DecksList), 1);
    }

    #[test]
    fn test_unknown_id_is_harmless() {
        let mut stacks = SnapshotStacks::new();
        assert_eq!(stacks.rollback(&CacheKey::DecksList, MutationId::new()), None);
    }
}
