//! Shared test helpers for gateway integration tests
//!
//! Spins up a wiremock server and returns an [`HttpRemoteGateway`]
//! pointed at it. JSON fixtures follow the backend wire format
//! (camelCase fields, string UUIDs, RFC 3339 timestamps).

use serde_json::json;
use uuid::Uuid;
use wiremock::MockServer;

use recallsync_gateway::{ApiClient, HttpRemoteGateway};

/// Starts a mock backend and a gateway pointed at it
pub async fn setup_gateway() -> (MockServer, HttpRemoteGateway) {
    let server = MockServer::start().await;
    let client = ApiClient::with_base_url(server.uri()).with_token("test-token");
    (server, HttpRemoteGateway::new(client))
}

/// A deck response body in the backend wire format
pub fn deck_body(id: Uuid, title: &str, cards_count: u32) -> serde_json::Value {
    json!({
        "id": id.to_string(),
        "title": title,
        "cardsCount": cards_count,
        "createdAt": "2026-08-01T10:00:00Z",
        "updatedAt": "2026-08-01T10:00:00Z"
    })
}

/// A card response body in the backend wire format
pub fn card_body(id: Uuid, deck_id: Uuid, front: &str, back: &str) -> serde_json::Value {
    json!({
        "id": id.to_string(),
        "deckId": deck_id.to_string(),
        "front": front,
        "back": back,
        "createdAt": "2026-08-01T10:00:00Z",
        "updatedAt": "2026-08-01T10:00:00Z"
    })
}

/// A progress response body in the backend wire format
pub fn progress_body(card_id: Uuid) -> serde_json::Value {
    json!({
        "id": Uuid::new_v4().to_string(),
        "cardId": card_id.to_string(),
        "easeFactor": 2.5,
        "interval": 1,
        "repetition": 1,
        "dueDate": "2026-08-02T10:00:00Z",
        "reviewCount": 1,
        "lastReviewed": "2026-08-01T10:00:00Z",
        "createdAt": "2026-08-01T10:00:00Z",
        "updatedAt": "2026-08-01T10:00:00Z"
    })
}

/// A study item body: progress fields flattened with the card embedded
pub fn study_item_body(card_id: Uuid, deck_id: Uuid, front: &str) -> serde_json::Value {
    let mut body = progress_body(card_id);
    body.as_object_mut().unwrap().insert(
        "card".to_string(),
        card_body(card_id, deck_id, front, "back"),
    );
    body
}

/// The backend's error body shape
pub fn error_body(error_id: &str, message: &str) -> serde_json::Value {
    json!({ "errorId": error_id, "message": message })
}
