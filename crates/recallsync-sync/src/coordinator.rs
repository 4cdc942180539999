//! Mutation coordinator
//!
//! The [`MutationCoordinator`] is the single write path to the remote
//! backend. Every mutation runs the same pipeline:
//!
//! 1. Resolve the cache keys the optimistic patch touches
//! 2. Push a pending frame per key, capturing the current entry state
//! 3. Apply the optimistic patch (`Fetching` status, synthesized value)
//! 4. Call the remote gateway - the single suspension point
//! 5. On success: commit the server-confirmed value, then fan out
//!    invalidation over derived keys
//! 6. On failure: restore each key to the value live when this mutation
//!    began, and return the typed error without invalidating anything
//!
//! Optimistic patches only rewrite entries that already hold a value: an
//! uncached list is not fabricated locally, it is simply invalidated on
//! commit and refetched on demand. Pending frames are pushed regardless,
//! so rollback stays exact when patched and unpatched mutations race on
//! the same key.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{debug, warn};

use recallsync_cache::{CacheStore, FreshnessStatus, InvalidationGraph};
use recallsync_core::domain::{
    CacheKey, CachedValue, Card, CardFace, CardId, Deck, DeckId, DeckTitle, Mutation, MutationId,
    Quality, StudyProgress,
};
use recallsync_core::ports::{
    CardDraft, CardPatch, DeckDraft, DeckPatch, GatewayResult, RemoteGateway,
};

use crate::snapshot::{Settled, SnapshotStacks};

/// Server-confirmed result of a committed mutation
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    Deck(Deck),
    Card(Card),
    Progress(StudyProgress),
    Deleted,
}

impl MutationOutcome {
    /// Returns the confirmed deck, if this outcome carries one
    pub fn into_deck(self) -> Option<Deck> {
        match self {
            MutationOutcome::Deck(deck) => Some(deck),
            _ => None,
        }
    }

    /// Returns the confirmed card, if this outcome carries one
    pub fn into_card(self) -> Option<Card> {
        match self {
            MutationOutcome::Card(card) => Some(card),
            _ => None,
        }
    }

    /// Returns the rescheduled progress record, if this outcome carries one
    pub fn into_progress(self) -> Option<StudyProgress> {
        match self {
            MutationOutcome::Progress(progress) => Some(progress),
            _ => None,
        }
    }
}

/// Coordinates optimistic writes against the cache and the remote backend
pub struct MutationCoordinator {
    store: Arc<CacheStore>,
    gateway: Arc<dyn RemoteGateway>,
    graph: InvalidationGraph,
    stacks: Mutex<SnapshotStacks>,
}

impl MutationCoordinator {
    /// Creates a coordinator over the given store and gateway
    pub fn new(store: Arc<CacheStore>, gateway: Arc<dyn RemoteGateway>) -> Self {
        Self {
            store,
            gateway,
            graph: InvalidationGraph::new(),
            stacks: Mutex::new(SnapshotStacks::new()),
        }
    }

    /// Executes one mutation end to end
    ///
    /// On success the confirmed value has been committed to the cache and
    /// every derived key has been invalidated. On failure every touched
    /// key has been restored to the state live when this mutation began,
    /// and no invalidation has been dispatched.
    ///
    /// # Errors
    ///
    /// Returns the gateway's normalized error untouched; rollback has
    /// already happened by the time the caller sees it.
    pub async fn execute(&self, mutation: Mutation) -> GatewayResult<MutationOutcome> {
        let id = MutationId::new();
        let deck_hint = self.resolve_deck_hint(&mutation);
        debug!(mutation = mutation.kind_name(), id = %id, "executing mutation");

        let outcome = match &mutation {
            Mutation::CreateDeck { title, description } => {
                self.create_deck(id, title.clone(), description.clone()).await
            }
            Mutation::UpdateDeck {
                id: deck_id,
                title,
                description,
            } => {
                self.update_deck(id, *deck_id, title.clone(), description.clone())
                    .await
            }
            Mutation::DeleteDeck { id: deck_id } => self.delete_deck(id, *deck_id).await,
            Mutation::CreateCard {
                deck_id,
                front,
                back,
            } => {
                self.create_card(id, *deck_id, front.clone(), back.clone())
                    .await
            }
            Mutation::UpdateCard {
                id: card_id,
                front,
                back,
            } => {
                self.update_card(id, *card_id, deck_hint, front.clone(), back.clone())
                    .await
            }
            Mutation::DeleteCard { id: card_id } => {
                self.delete_card(id, *card_id, deck_hint).await
            }
            Mutation::ReviewCard { card_id, quality } => {
                self.review_card(id, *card_id, *quality).await
            }
        };

        match outcome {
            Ok(value) => {
                // Fan-out runs strictly after the commit, never on failure
                for selector in self.graph.fanout(&mutation, deck_hint) {
                    self.store.invalidate_selector(&selector);
                }
                debug!(mutation = mutation.kind_name(), id = %id, "mutation committed");
                Ok(value)
            }
            Err(err) => {
                warn!(
                    mutation = mutation.kind_name(),
                    id = %id,
                    error = %err,
                    "mutation failed, cache rolled back"
                );
                Err(err)
            }
        }
    }

    // ========================================================================
    // Per-kind pipelines
    // ========================================================================

    async fn create_deck(
        &self,
        id: MutationId,
        title: DeckTitle,
        description: Option<String>,
    ) -> GatewayResult<MutationOutcome> {
        let key = CacheKey::DecksList;
        let draft = Deck::draft(title.clone(), description.clone());
        let temp_id = draft.id();

        self.begin(&key, id);
        self.patch_decks_list(|decks| {
            let mut patched = Vec::with_capacity(decks.len() + 1);
            patched.push(draft.clone());
            patched.extend(decks.iter().cloned());
            patched
        });

        match self.gateway.create_deck(&DeckDraft { title, description }).await {
            Ok(deck) => {
                let confirmed = deck.clone();
                self.commit_one(&key, id, move |value| {
                    value.map(|v| swap_deck(v, temp_id, &confirmed))
                });
                Ok(MutationOutcome::Deck(deck))
            }
            Err(err) => {
                self.rollback_one(&key, id);
                Err(err)
            }
        }
    }

    async fn update_deck(
        &self,
        id: MutationId,
        deck_id: DeckId,
        title: Option<DeckTitle>,
        description: Option<String>,
    ) -> GatewayResult<MutationOutcome> {
        let item_key = CacheKey::DeckItem(deck_id);
        let list_key = CacheKey::DecksList;

        self.begin(&item_key, id);
        self.begin(&list_key, id);

        let apply = |deck: &mut Deck| {
            if let Some(title) = title.clone() {
                deck.set_title(title);
            }
            if let Some(description) = description.clone() {
                deck.set_description(Some(description));
            }
        };
        if let Some(cached) = self.cached_deck(deck_id) {
            let mut patched = cached;
            apply(&mut patched);
            self.store
                .set(&item_key, CachedValue::Deck(patched), FreshnessStatus::Fetching);
        }
        self.patch_decks_list(|decks| {
            decks
                .iter()
                .cloned()
                .map(|mut deck| {
                    if deck.id() == deck_id {
                        apply(&mut deck);
                    }
                    deck
                })
                .collect()
        });

        let patch = DeckPatch { title, description };
        match self.gateway.update_deck(deck_id, &patch).await {
            Ok(deck) => {
                let confirmed = deck.clone();
                self.commit_one(&list_key, id, move |value| {
                    value.map(|v| swap_deck(v, deck_id, &confirmed))
                });
                let confirmed = deck.clone();
                self.commit_one(&item_key, id, move |_| {
                    Some(CachedValue::Deck(confirmed.clone()))
                });
                Ok(MutationOutcome::Deck(deck))
            }
            Err(err) => {
                self.rollback_one(&list_key, id);
                self.rollback_one(&item_key, id);
                Err(err)
            }
        }
    }

    async fn delete_deck(&self, id: MutationId, deck_id: DeckId) -> GatewayResult<MutationOutcome> {
        let key = CacheKey::DecksList;

        self.begin(&key, id);
        self.patch_decks_list(|decks| {
            decks
                .iter()
                .filter(|deck| deck.id() != deck_id)
                .cloned()
                .collect()
        });

        match self.gateway.delete_deck(deck_id).await {
            Ok(()) => {
                self.commit_one(&key, id, move |value| {
                    value.map(|v| match v {
                        CachedValue::Decks(decks) => CachedValue::Decks(
                            decks.into_iter().filter(|d| d.id() != deck_id).collect(),
                        ),
                        other => other,
                    })
                });
                Ok(MutationOutcome::Deleted)
            }
            Err(err) => {
                self.rollback_one(&key, id);
                Err(err)
            }
        }
    }

    async fn create_card(
        &self,
        id: MutationId,
        deck_id: DeckId,
        front: CardFace,
        back: CardFace,
    ) -> GatewayResult<MutationOutcome> {
        let key = CacheKey::CardsList(deck_id);
        let draft = Card::draft(deck_id, front.clone(), back.clone());
        let temp_id = draft.id();

        self.begin(&key, id);
        self.patch_cards_list(deck_id, |cards| {
            let mut patched = Vec::with_capacity(cards.len() + 1);
            patched.push(draft.clone());
            patched.extend(cards.iter().cloned());
            patched
        });

        let gateway_draft = CardDraft {
            deck_id,
            front,
            back,
        };
        match self.gateway.create_card(&gateway_draft).await {
            Ok(card) => {
                let confirmed = card.clone();
                self.commit_one(&key, id, move |value| {
                    value.map(|v| swap_card(v, temp_id, &confirmed))
                });
                Ok(MutationOutcome::Card(card))
            }
            Err(err) => {
                self.rollback_one(&key, id);
                Err(err)
            }
        }
    }

    async fn update_card(
        &self,
        id: MutationId,
        card_id: CardId,
        deck_hint: Option<DeckId>,
        front: Option<CardFace>,
        back: Option<CardFace>,
    ) -> GatewayResult<MutationOutcome> {
        let item_key = CacheKey::CardItem(card_id);
        let list_key = deck_hint.map(CacheKey::CardsList);

        self.begin(&item_key, id);
        if let Some(list_key) = &list_key {
            self.begin(list_key, id);
        }

        let apply = |card: &mut Card| {
            if let Some(front) = front.clone() {
                card.set_front(front);
            }
            if let Some(back) = back.clone() {
                card.set_back(back);
            }
        };
        if let Some(cached) = self.cached_card(card_id) {
            let mut patched = cached;
            apply(&mut patched);
            self.store
                .set(&item_key, CachedValue::Card(patched), FreshnessStatus::Fetching);
        }
        if let Some(deck_id) = deck_hint {
            self.patch_cards_list(deck_id, |cards| {
                cards
                    .iter()
                    .cloned()
                    .map(|mut card| {
                        if card.id() == card_id {
                            apply(&mut card);
                        }
                        card
                    })
                    .collect()
            });
        }

        let patch = CardPatch { front, back };
        match self.gateway.update_card(card_id, &patch).await {
            Ok(card) => {
                if let Some(list_key) = &list_key {
                    let confirmed = card.clone();
                    self.commit_one(list_key, id, move |value| {
                        value.map(|v| swap_card(v, card_id, &confirmed))
                    });
                }
                let confirmed = card.clone();
                self.commit_one(&item_key, id, move |_| {
                    Some(CachedValue::Card(confirmed.clone()))
                });
                Ok(MutationOutcome::Card(card))
            }
            Err(err) => {
                if let Some(list_key) = &list_key {
                    self.rollback_one(list_key, id);
                }
                self.rollback_one(&item_key, id);
                Err(err)
            }
        }
    }

    async fn delete_card(
        &self,
        id: MutationId,
        card_id: CardId,
        deck_hint: Option<DeckId>,
    ) -> GatewayResult<MutationOutcome> {
        let list_key = deck_hint.map(CacheKey::CardsList);

        if let (Some(list_key), Some(deck_id)) = (&list_key, deck_hint) {
            self.begin(list_key, id);
            self.patch_cards_list(deck_id, |cards| {
                cards
                    .iter()
                    .filter(|card| card.id() != card_id)
                    .cloned()
                    .collect()
            });
        }

        match self.gateway.delete_card(card_id).await {
            Ok(()) => {
                if let Some(list_key) = &list_key {
                    self.commit_one(list_key, id, move |value| {
                        value.map(|v| match v {
                            CachedValue::Cards(cards) => CachedValue::Cards(
                                cards.into_iter().filter(|c| c.id() != card_id).collect(),
                            ),
                            other => other,
                        })
                    });
                }
                Ok(MutationOutcome::Deleted)
            }
            Err(err) => {
                if let Some(list_key) = &list_key {
                    self.rollback_one(list_key, id);
                }
                Err(err)
            }
        }
    }

    async fn review_card(
        &self,
        id: MutationId,
        card_id: CardId,
        quality: Quality,
    ) -> GatewayResult<MutationOutcome> {
        let key = CacheKey::StudyProgress(card_id);

        self.begin(&key, id);
        let cached = self
            .store
            .get(&key)
            .value()
            .and_then(|v| v.as_progress().cloned());
        if let Some(mut progress) = cached {
            progress.touch_reviewed(Utc::now());
            self.store.set(
                &key,
                CachedValue::Progress(Some(progress)),
                FreshnessStatus::Fetching,
            );
        }

        match self.gateway.review_card(card_id, quality).await {
            Ok(progress) => {
                let confirmed = progress.clone();
                self.commit_one(&key, id, move |_| {
                    Some(CachedValue::Progress(Some(confirmed.clone())))
                });
                Ok(MutationOutcome::Progress(progress))
            }
            Err(err) => {
                self.rollback_one(&key, id);
                Err(err)
            }
        }
    }

    // ========================================================================
    // Frame bookkeeping
    // ========================================================================

    fn begin(&self, key: &CacheKey, id: MutationId) {
        let snapshot = self.store.snapshot(key);
        self.stacks
            .lock()
            .expect("stack lock poisoned")
            .push(*key, id, snapshot);
    }

    fn commit_one(
        &self,
        key: &CacheKey,
        id: MutationId,
        confirm: impl Fn(Option<CachedValue>) -> Option<CachedValue>,
    ) {
        let settled = self
            .stacks
            .lock()
            .expect("stack lock poisoned")
            .commit(key, id, &confirm);
        if settled == Settled::Topmost {
            let current = self.store.get(key).value().cloned();
            if let Some(value) = confirm(current) {
                self.store.set(key, value, FreshnessStatus::Fresh);
            }
        }
    }

    fn rollback_one(&self, key: &CacheKey, id: MutationId) {
        let restore = self
            .stacks
            .lock()
            .expect("stack lock poisoned")
            .rollback(key, id);
        if let Some(snapshot) = restore {
            self.store.restore(key, snapshot);
        }
    }

    // ========================================================================
    // Cache lookups and patches
    // ========================================================================

    /// Resolves the deck a card mutation belongs to from the cached card, if
    /// any. Deck mutations carry their target directly.
    fn resolve_deck_hint(&self, mutation: &Mutation) -> Option<DeckId> {
        mutation.target_deck().or_else(|| {
            mutation
                .target_card()
                .and_then(|card_id| self.cached_card(card_id).map(|card| card.deck_id()))
        })
    }

    fn cached_deck(&self, deck_id: DeckId) -> Option<Deck> {
        self.store
            .get(&CacheKey::DeckItem(deck_id))
            .value()
            .and_then(|v| v.as_deck().cloned())
    }

    fn cached_card(&self, card_id: CardId) -> Option<Card> {
        self.store
            .get(&CacheKey::CardItem(card_id))
            .value()
            .and_then(|v| v.as_card().cloned())
    }

    fn patch_decks_list(&self, patch: impl Fn(&[Deck]) -> Vec<Deck>) {
        let key = CacheKey::DecksList;
        if let Some(decks) = self.store.get(&key).value().and_then(|v| v.as_decks().map(<[Deck]>::to_vec)) {
            self.store.set(
                &key,
                CachedValue::Decks(patch(&decks)),
                FreshnessStatus::Fetching,
            );
        }
    }

    fn patch_cards_list(&self, deck_id: DeckId, patch: impl Fn(&[Card]) -> Vec<Card>) {
        let key = CacheKey::CardsList(deck_id);
        if let Some(cards) = self.store.get(&key).value().and_then(|v| v.as_cards().map(<[Card]>::to_vec)) {
            self.store.set(
                &key,
                CachedValue::Cards(patch(&cards)),
                FreshnessStatus::Fetching,
            );
        }
    }
}

/// Replaces the deck with id `target` by the confirmed snapshot, leaving
/// the rest of the list as the user sees it
fn swap_deck(value: CachedValue, target: DeckId, confirmed: &Deck) -> CachedValue {
    match value {
        CachedValue::Decks(decks) => CachedValue::Decks(
            decks
                .into_iter()
                .map(|deck| {
                    if deck.id() == target {
                        confirmed.clone()
                    } else {
                        deck
                    }
                })
                .collect(),
        ),
        other => other,
    }
}

/// Replaces the card with id `target` by the confirmed snapshot
fn swap_card(value: CachedValue, target: CardId, confirmed: &Card) -> CachedValue {
    match value {
        CachedValue::Cards(cards) => CachedValue::Cards(
            cards
                .into_iter()
                .map(|card| {
                    if card.id() == target {
                        confirmed.clone()
                    } else {
                        card
                    }
                })
                .collect(),
        ),
        other => other,
    }
}
