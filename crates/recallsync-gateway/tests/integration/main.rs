//! Integration tests for recallsync-gateway
//!
//! Uses wiremock to simulate the backend REST API and verifies that the
//! HTTP gateway hits the right endpoints, parses the wire format, and
//! normalizes every failure shape into the typed error taxonomy.

mod common;

mod test_cards;
mod test_decks;
mod test_study;
