//! Port definitions (hexagonal architecture interfaces)
//!
//! Ports are interfaces the domain core depends on, but whose
//! implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`RemoteGateway`] - The remote source of truth for decks, cards, and
//!   study scheduling (`recallsync-gateway` implements it over HTTP)

pub mod remote_gateway;

pub use remote_gateway::{
    CardDraft, CardPatch, DeckDraft, DeckPatch, GatewayError, GatewayErrorKind, GatewayResult,
    RemoteGateway,
};
