//! Integration tests for the cache store and invalidation graph

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use recallsync_cache::{CacheStore, FreshnessStatus, InvalidationGraph};
use recallsync_core::config::CacheConfig;
use recallsync_core::domain::{
    CacheKey, CachedValue, Card, CardId, Deck, DeckId, Mutation, Quality,
};

fn sample_deck(title: &str) -> Deck {
    Deck::new(
        DeckId::new(),
        title.parse().unwrap(),
        None,
        0,
        Utc::now(),
        Utc::now(),
    )
}

fn sample_card(deck_id: DeckId) -> Card {
    Card::new(
        CardId::new(),
        deck_id,
        "front".parse().unwrap(),
        "back".parse().unwrap(),
        Utc::now(),
        Utc::now(),
    )
}

#[test]
fn test_review_fanout_marks_every_study_queue_stale() {
    let store = CacheStore::new(CacheConfig::default());
    let graph = InvalidationGraph::new();

    let deck_a = DeckId::new();
    let deck_b = DeckId::new();
    store.set(
        &CacheKey::StudyNext(deck_a),
        CachedValue::StudyQueue(Vec::new()),
        FreshnessStatus::Fresh,
    );
    store.set(
        &CacheKey::StudyNext(deck_b),
        CachedValue::StudyQueue(Vec::new()),
        FreshnessStatus::Fresh,
    );

    let mutation = Mutation::ReviewCard {
        card_id: CardId::new(),
        quality: Quality::new(5).unwrap(),
    };
    for selector in graph.fanout(&mutation, None) {
        store.invalidate_selector(&selector);
    }

    assert!(store.get(&CacheKey::StudyNext(deck_a)).status().is_stale());
    assert!(store.get(&CacheKey::StudyNext(deck_b)).status().is_stale());
}

#[test]
fn test_family_invalidation_spares_other_families() {
    let store = CacheStore::new(CacheConfig::default());
    let graph = InvalidationGraph::new();

    let deck = sample_deck("Kanji");
    let deck_id = deck.id();
    store.set(
        &CacheKey::DeckItem(deck_id),
        CachedValue::Deck(deck.clone()),
        FreshnessStatus::Fresh,
    );
    store.set(
        &CacheKey::CardsList(deck_id),
        CachedValue::Cards(vec![sample_card(deck_id)]),
        FreshnessStatus::Fresh,
    );

    let mutation = Mutation::ReviewCard {
        card_id: CardId::new(),
        quality: Quality::new(3).unwrap(),
    };
    for selector in graph.fanout(&mutation, None) {
        store.invalidate_selector(&selector);
    }

    // Card lists go stale on review, deck items do not
    assert!(store.get(&CacheKey::CardsList(deck_id)).status().is_stale());
    assert!(store.get(&CacheKey::DeckItem(deck_id)).status().is_fresh());
}

#[test]
fn test_invalidation_is_idempotent() {
    let store = CacheStore::new(CacheConfig::default());

    let deck = sample_deck("Geography");
    store.set(
        &CacheKey::DecksList,
        CachedValue::Decks(vec![deck.clone()]),
        FreshnessStatus::Fresh,
    );

    store.invalidate(&CacheKey::DecksList);
    let first = store.snapshot(&CacheKey::DecksList);
    store.invalidate(&CacheKey::DecksList);
    let second = store.snapshot(&CacheKey::DecksList);

    assert_eq!(first.status, second.status);
    assert_eq!(first.value, second.value);
}

#[test]
fn test_snapshot_restore_round_trip() {
    let store = CacheStore::new(CacheConfig::default());
    let deck = sample_deck("History");

    store.set(
        &CacheKey::DecksList,
        CachedValue::Decks(vec![deck.clone()]),
        FreshnessStatus::Fresh,
    );
    let before = store.snapshot(&CacheKey::DecksList);

    // Optimistic overwrite, then roll back
    store.set(
        &CacheKey::DecksList,
        CachedValue::Decks(Vec::new()),
        FreshnessStatus::Fresh,
    );
    store.restore(&CacheKey::DecksList, before.clone());

    let after = store.snapshot(&CacheKey::DecksList);
    assert_eq!(after.value, before.value);
    assert_eq!(after.status, before.status);
    assert_eq!(after.fetched_at, before.fetched_at);
}

#[test]
fn test_subscriber_sees_restore() {
    let store = CacheStore::new(CacheConfig::default());
    let notifications = Arc::new(AtomicUsize::new(0));

    store.set(
        &CacheKey::DecksList,
        CachedValue::DueCount(7),
        FreshnessStatus::Fresh,
    );
    let snapshot = store.snapshot(&CacheKey::DecksList);

    let counter = Arc::clone(&notifications);
    let _sub = store.subscribe(&CacheKey::DecksList, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    store.set(
        &CacheKey::DecksList,
        CachedValue::DueCount(8),
        FreshnessStatus::Fresh,
    );
    store.restore(&CacheKey::DecksList, snapshot);

    assert_eq!(notifications.load(Ordering::SeqCst), 2);
    assert_eq!(
        store
            .get(&CacheKey::DecksList)
            .value()
            .and_then(|v| v.as_due_count()),
        Some(7)
    );
}
