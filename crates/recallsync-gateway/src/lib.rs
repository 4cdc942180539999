//! recallsync Gateway - HTTP adapter for the remote backend
//!
//! Implements the [`RemoteGateway`] port over the backend's REST API:
//! decks and cards CRUD, the due-card queue, and review grading. Every
//! backend failure is normalized into a typed [`GatewayError`] before it
//! reaches the core.
//!
//! ## Modules
//!
//! - [`client`] - Authenticated JSON client over `reqwest`
//! - [`gateway`] - [`HttpRemoteGateway`], the port implementation
//!
//! [`RemoteGateway`]: recallsync_core::ports::RemoteGateway
//! [`GatewayError`]: recallsync_core::ports::GatewayError

pub mod client;
pub mod gateway;

pub use client::ApiClient;
pub use gateway::HttpRemoteGateway;
