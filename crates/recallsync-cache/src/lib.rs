//! recallsync Cache - In-memory entity cache
//!
//! Keyed store of entity snapshots with freshness state, synchronous
//! subscriber notification, and stale-while-revalidate invalidation.
//!
//! ## Key Components
//!
//! - [`CacheStore`] - The store itself; one entry per [`CacheKey`]
//! - [`CacheEntry`] / [`FreshnessStatus`] - Entry snapshot and lifecycle
//! - [`InvalidationGraph`] - Static mutation → key-family fan-out table
//!
//! ## Lifecycle
//!
//! Entries are created on first read or subscribe and live until explicit
//! invalidation replaces their status or [`CacheStore::clear`] tears the
//! store down at session end. There is no background garbage collection and
//! nothing is persisted across process restarts.
//!
//! [`CacheKey`]: recallsync_core::domain::CacheKey

pub mod entry;
pub mod invalidation;
pub mod store;

pub use entry::{CacheEntry, EntrySnapshot, FreshnessStatus};
pub use invalidation::InvalidationGraph;
pub use store::{CacheStore, Subscription};
