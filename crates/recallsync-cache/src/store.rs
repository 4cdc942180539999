//! The cache store
//!
//! [`CacheStore`] owns every [`CacheEntry`] exclusively. Reads never block;
//! writes notify that key's subscribers synchronously before returning.
//! Invalidation marks entries stale without clearing their values
//! (stale-while-revalidate) and schedules a background refetch only for
//! keys somebody is still watching.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use recallsync_core::config::CacheConfig;
use recallsync_core::domain::{CacheKey, CachedValue, KeyFamily, KeySelector};

use crate::entry::{CacheEntry, EntrySnapshot, FreshnessStatus};

/// Callback invoked with the entry's new state on every set/invalidate
pub type SubscriberCallback = Arc<dyn Fn(&CacheEntry) + Send + Sync>;

/// One key's entry plus its live subscribers
struct Slot {
    entry: CacheEntry,
    subscribers: Vec<(u64, SubscriberCallback)>,
}

impl Slot {
    fn idle(key: CacheKey, stale_after: Duration) -> Self {
        Self {
            entry: CacheEntry::idle(key, stale_after),
            subscribers: Vec::new(),
        }
    }
}

/// Keyed store of entity snapshots with freshness state
///
/// The store is an explicit instance created at session start and torn down
/// at logout/navigation-away; collaborators hold it by `Arc` rather than
/// reaching for a global.
pub struct CacheStore {
    slots: Arc<Mutex<HashMap<CacheKey, Slot>>>,
    policy: CacheConfig,
    refetch_tx: Mutex<Option<mpsc::UnboundedSender<CacheKey>>>,
    next_subscriber_id: AtomicU64,
}

impl CacheStore {
    /// Creates a store with the given freshness policy
    pub fn new(policy: CacheConfig) -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            policy,
            refetch_tx: Mutex::new(None),
            next_subscriber_id: AtomicU64::new(1),
        }
    }

    /// Opens the background-refetch queue and returns its receiving end
    ///
    /// After this call, invalidating a key with at least one subscriber
    /// enqueues that key for refetch. Without a queue, invalidation only
    /// marks entries stale.
    pub fn refetch_queue(&self) -> mpsc::UnboundedReceiver<CacheKey> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.refetch_tx.lock().expect("cache lock poisoned") = Some(tx);
        rx
    }

    /// Returns the current entry for `key`, creating an Idle entry on
    /// first touch. Never blocks on any in-flight write.
    pub fn get(&self, key: &CacheKey) -> CacheEntry {
        let mut slots = self.slots.lock().expect("cache lock poisoned");
        let stale_after = self.policy.stale_after(key.family());
        slots
            .entry(*key)
            .or_insert_with(|| Slot::idle(*key, stale_after))
            .entry
            .clone()
    }

    /// Captures the rollback-relevant snapshot of `key`'s entry
    pub fn snapshot(&self, key: &CacheKey) -> EntrySnapshot {
        self.get(key).snapshot()
    }

    /// Replaces `key`'s value and status, stamps `fetched_at`, and notifies
    /// that key's subscribers synchronously
    pub fn set(&self, key: &CacheKey, value: CachedValue, status: FreshnessStatus) {
        let notify = {
            let mut slots = self.slots.lock().expect("cache lock poisoned");
            let stale_after = self.policy.stale_after(key.family());
            let slot = slots
                .entry(*key)
                .or_insert_with(|| Slot::idle(*key, stale_after));
            slot.entry.replace(value, status);
            trace!(key = %key, status = %status, "cache set");
            Self::pending_notifications(slot)
        };
        Self::dispatch(notify);
    }

    /// Restores a previously captured snapshot (rollback path) and notifies
    pub fn restore(&self, key: &CacheKey, snapshot: EntrySnapshot) {
        let notify = {
            let mut slots = self.slots.lock().expect("cache lock poisoned");
            let stale_after = self.policy.stale_after(key.family());
            let slot = slots
                .entry(*key)
                .or_insert_with(|| Slot::idle(*key, stale_after));
            slot.entry.apply_snapshot(snapshot);
            debug!(key = %key, "cache entry restored from snapshot");
            Self::pending_notifications(slot)
        };
        Self::dispatch(notify);
    }

    /// Marks `key`'s entry as failed while retaining the last good value
    /// (stale-if-error), and notifies
    pub fn set_error(&self, key: &CacheKey, message: &str) {
        let notify = {
            let mut slots = self.slots.lock().expect("cache lock poisoned");
            let stale_after = self.policy.stale_after(key.family());
            let slot = slots
                .entry(*key)
                .or_insert_with(|| Slot::idle(*key, stale_after));
            slot.entry.mark_error();
            warn!(key = %key, message, "cache entry marked error");
            Self::pending_notifications(slot)
        };
        Self::dispatch(notify);
    }

    /// Marks one key stale; see [`CacheStore::invalidate_matching`]
    pub fn invalidate(&self, key: &CacheKey) {
        self.invalidate_matching(|candidate| candidate == key);
    }

    /// Marks every key of a family stale; see
    /// [`CacheStore::invalidate_matching`]
    pub fn invalidate_family(&self, family: KeyFamily) {
        self.invalidate_matching(|candidate| candidate.family() == family);
    }

    /// Resolves a selector against live entries and marks matches stale
    pub fn invalidate_selector(&self, selector: &KeySelector) {
        match selector {
            KeySelector::Exact(key) => self.invalidate(key),
            KeySelector::Family(family) => self.invalidate_family(*family),
        }
    }

    /// Marks every live entry matching `predicate` as Stale
    ///
    /// Values are never cleared. A refetch is scheduled only for keys that
    /// currently have at least one subscriber, and never synchronously.
    /// Invalidating an already-Stale entry changes no value; subscribers
    /// are re-notified and the refetch is re-enqueued.
    pub fn invalidate_matching(&self, predicate: impl Fn(&CacheKey) -> bool) {
        let (notify, refetch) = {
            let mut slots = self.slots.lock().expect("cache lock poisoned");
            let mut notify = Vec::new();
            let mut refetch = Vec::new();
            for (key, slot) in slots.iter_mut() {
                if !predicate(key) {
                    continue;
                }
                // An entry that has never been fetched has nothing to revalidate
                if slot.entry.status() == FreshnessStatus::Idle {
                    continue;
                }
                slot.entry.mark_stale();
                trace!(key = %key, "cache invalidated");
                notify.extend(Self::pending_notifications(slot));
                if !slot.subscribers.is_empty() {
                    refetch.push(*key);
                }
            }
            (notify, refetch)
        };
        Self::dispatch(notify);

        if !refetch.is_empty() {
            let tx = self.refetch_tx.lock().expect("cache lock poisoned").clone();
            if let Some(tx) = tx {
                for key in refetch {
                    if tx.send(key).is_err() {
                        debug!(key = %key, "refetch queue closed, skipping");
                    }
                }
            }
        }
    }

    /// Registers interest in `key`; the callback fires on every set,
    /// restore, error, or invalidate affecting that key
    pub fn subscribe(
        &self,
        key: &CacheKey,
        callback: impl Fn(&CacheEntry) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        let mut slots = self.slots.lock().expect("cache lock poisoned");
        let stale_after = self.policy.stale_after(key.family());
        let slot = slots
            .entry(*key)
            .or_insert_with(|| Slot::idle(*key, stale_after));
        slot.subscribers.push((id, Arc::new(callback)));
        Subscription {
            slots: Arc::clone(&self.slots),
            key: *key,
            id,
            active: true,
        }
    }

    /// Number of live subscribers for `key`
    pub fn subscriber_count(&self, key: &CacheKey) -> usize {
        let slots = self.slots.lock().expect("cache lock poisoned");
        slots.get(key).map_or(0, |slot| slot.subscribers.len())
    }

    /// Number of entries currently held
    pub fn len(&self) -> usize {
        self.slots.lock().expect("cache lock poisoned").len()
    }

    /// Returns true if the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry and subscriber (session teardown)
    pub fn clear(&self) {
        let mut slots = self.slots.lock().expect("cache lock poisoned");
        slots.clear();
        debug!("cache store cleared");
    }

    /// Clones out the callbacks due for one slot, paired with the entry
    /// state they should observe. Invoked outside the lock.
    fn pending_notifications(slot: &Slot) -> Vec<(SubscriberCallback, CacheEntry)> {
        slot.subscribers
            .iter()
            .map(|(_, callback)| (Arc::clone(callback), slot.entry.clone()))
            .collect()
    }

    fn dispatch(notifications: Vec<(SubscriberCallback, CacheEntry)>) {
        for (callback, entry) in notifications {
            callback(&entry);
        }
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

/// Disposer handle returned by [`CacheStore::subscribe`]
///
/// Dropping the handle (or calling [`Subscription::unsubscribe`])
/// deregisters the callback. Losing interest never cancels in-flight
/// writes; they run to completion against the store regardless.
pub struct Subscription {
    slots: Arc<Mutex<HashMap<CacheKey, Slot>>>,
    key: CacheKey,
    id: u64,
    active: bool,
}

impl Subscription {
    /// Explicitly deregisters the callback
    pub fn unsubscribe(mut self) {
        self.remove();
    }

    /// Returns the subscribed key
    pub fn key(&self) -> CacheKey {
        self.key
    }

    fn remove(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        let mut slots = self.slots.lock().expect("cache lock poisoned");
        if let Some(slot) = slots.get_mut(&self.key) {
            slot.subscribers.retain(|(id, _)| *id != self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.remove();
    }
}
