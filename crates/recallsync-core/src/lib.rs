//! recallsync Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `Deck`, `Card`, `StudyProgress`, `StudyItem`
//! - **Cache vocabulary** - `CacheKey`, `KeyFamily`, `CachedValue`, `Mutation`
//! - **Port definitions** - The `RemoteGateway` trait and its typed error
//! - **Validated newtypes** - Ids, `Quality`, `DeckTitle`, `CardFace`
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no I/O. Ports define
//! trait interfaces that adapter crates implement (`recallsync-gateway` for
//! the HTTP backend). The cache, mutation, and study crates orchestrate
//! domain values through those interfaces.

pub mod config;
pub mod domain;
pub mod ports;
