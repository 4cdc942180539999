//! Background refetch worker
//!
//! Drains the cache's refetch queue and revalidates each key against the
//! remote gateway. The store only enqueues keys with live subscribers, so
//! the worker never fetches data nobody is watching.
//!
//! A failed refetch marks the entry `Error` but keeps its last good value
//! (stale-if-error); the next invalidation schedules another attempt.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

use recallsync_cache::{CacheStore, FreshnessStatus};
use recallsync_core::config::StudyConfig;
use recallsync_core::domain::{CacheKey, CachedValue};
use recallsync_core::ports::{GatewayResult, RemoteGateway};

/// Revalidates invalidated cache keys against the remote backend
pub struct RefetchWorker {
    store: Arc<CacheStore>,
    gateway: Arc<dyn RemoteGateway>,
    study: StudyConfig,
}

impl RefetchWorker {
    /// Creates a worker over the given store and gateway
    ///
    /// The study config supplies the queue fetch limit and the probe limit
    /// used to derive due counts.
    pub fn new(store: Arc<CacheStore>, gateway: Arc<dyn RemoteGateway>, study: StudyConfig) -> Self {
        Self {
            store,
            gateway,
            study,
        }
    }

    /// Drains the queue until the store drops its sending half
    pub async fn run(self, mut queue: UnboundedReceiver<CacheKey>) {
        while let Some(key) = queue.recv().await {
            self.refetch(&key).await;
        }
        debug!("refetch queue closed, worker stopping");
    }

    /// Revalidates one key
    pub async fn refetch(&self, key: &CacheKey) {
        match self.fetch(key).await {
            Ok(value) => {
                debug!(key = %key, "refetched");
                self.store.set(key, value, FreshnessStatus::Fresh);
            }
            Err(err) => {
                warn!(key = %key, error = %err, "refetch failed");
                self.store.set_error(key, &err.message);
            }
        }
    }

    async fn fetch(&self, key: &CacheKey) -> GatewayResult<CachedValue> {
        match key {
            CacheKey::DecksList => Ok(CachedValue::Decks(self.gateway.list_decks().await?)),
            CacheKey::DeckItem(id) => Ok(CachedValue::Deck(self.gateway.get_deck(*id).await?)),
            CacheKey::CardsList(deck_id) => {
                Ok(CachedValue::Cards(self.gateway.list_cards(*deck_id).await?))
            }
            CacheKey::CardItem(id) => Ok(CachedValue::Card(self.gateway.get_card(*id).await?)),
            CacheKey::StudyNext(deck_id) => Ok(CachedValue::StudyQueue(
                self.gateway
                    .get_next_due(*deck_id, self.study.default_limit)
                    .await?,
            )),
            CacheKey::StudyProgress(card_id) => Ok(CachedValue::Progress(
                self.gateway.get_progress(*card_id).await?,
            )),
            // The backend exposes no count endpoint; probe the due queue
            // with a limit large enough to cover any realistic deck
            CacheKey::StudyDueCount(deck_id) => {
                let items = self
                    .gateway
                    .get_next_due(*deck_id, self.study.due_count_probe_limit)
                    .await?;
                Ok(CachedValue::DueCount(items.len() as u64))
            }
        }
    }
}
