//! Deck endpoint tests

use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use recallsync_core::domain::{DeckId, DeckTitle};
use recallsync_core::ports::{DeckDraft, DeckPatch, GatewayErrorKind, RemoteGateway};

use crate::common;

#[tokio::test]
async fn test_list_decks() {
    let (server, gateway) = common::setup_gateway().await;
    Mock::given(method("GET"))
        .and(path("/decks"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::deck_body(Uuid::new_v4(), "Spanish", 12),
            common::deck_body(Uuid::new_v4(), "Kanji", 40),
        ])))
        .mount(&server)
        .await;

    let decks = gateway.list_decks().await.unwrap();
    assert_eq!(decks.len(), 2);
    assert_eq!(decks[0].title().as_str(), "Spanish");
    assert_eq!(decks[1].cards_count(), 40);
}

#[tokio::test]
async fn test_create_deck_posts_draft() {
    let (server, gateway) = common::setup_gateway().await;
    let server_id = Uuid::new_v4();
    Mock::given(method("POST"))
        .and(path("/decks"))
        .and(body_partial_json(json!({ "title": "Spanish" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(common::deck_body(server_id, "Spanish", 0)),
        )
        .mount(&server)
        .await;

    let draft = DeckDraft {
        title: DeckTitle::new("Spanish".to_string()).unwrap(),
        description: None,
    };
    let deck = gateway.create_deck(&draft).await.unwrap();
    assert_eq!(deck.id(), DeckId::from(server_id));
    assert_eq!(deck.title().as_str(), "Spanish");
}

#[tokio::test]
async fn test_update_deck_puts_patch_to_item_path() {
    let (server, gateway) = common::setup_gateway().await;
    let id = Uuid::new_v4();
    Mock::given(method("PUT"))
        .and(path(format!("/decks/{id}")))
        .and(body_partial_json(json!({ "title": "Renamed" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::deck_body(id, "Renamed", 3)),
        )
        .mount(&server)
        .await;

    let patch = DeckPatch {
        title: Some(DeckTitle::new("Renamed".to_string()).unwrap()),
        description: None,
    };
    let deck = gateway.update_deck(DeckId::from(id), &patch).await.unwrap();
    assert_eq!(deck.title().as_str(), "Renamed");
}

#[tokio::test]
async fn test_delete_deck() {
    let (server, gateway) = common::setup_gateway().await;
    let id = Uuid::new_v4();
    Mock::given(method("DELETE"))
        .and(path(format!("/decks/{id}")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    gateway.delete_deck(DeckId::from(id)).await.unwrap();
}

#[tokio::test]
async fn test_duplicate_title_maps_to_conflict() {
    let (server, gateway) = common::setup_gateway().await;
    Mock::given(method("POST"))
        .and(path("/decks"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(common::error_body("DeckTitleTaken", "title already in use")),
        )
        .mount(&server)
        .await;

    let draft = DeckDraft {
        title: DeckTitle::new("Dup".to_string()).unwrap(),
        description: None,
    };
    let err = gateway.create_deck(&draft).await.unwrap_err();
    assert_eq!(err.kind, GatewayErrorKind::ConflictFailure);
    assert_eq!(err.message, "title already in use");
}

#[tokio::test]
async fn test_missing_deck_maps_to_not_found() {
    let (server, gateway) = common::setup_gateway().await;
    let id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path(format!("/decks/{id}")))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(common::error_body("DeckNotFound", "no such deck")),
        )
        .mount(&server)
        .await;

    let err = gateway.get_deck(DeckId::from(id)).await.unwrap_err();
    assert_eq!(err.kind, GatewayErrorKind::NotFound);
}

#[tokio::test]
async fn test_unparseable_error_body_falls_back_to_status() {
    let (server, gateway) = common::setup_gateway().await;
    Mock::given(method("GET"))
        .and(path("/decks"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = gateway.list_decks().await.unwrap_err();
    assert_eq!(err.kind, GatewayErrorKind::Unknown);
}

#[tokio::test]
async fn test_unreachable_server_maps_to_network_failure() {
    // Nothing listens on this port
    let client = recallsync_gateway::ApiClient::with_base_url("http://127.0.0.1:1");
    let gateway = recallsync_gateway::HttpRemoteGateway::new(client);

    let err = gateway.list_decks().await.unwrap_err();
    assert_eq!(err.kind, GatewayErrorKind::NetworkFailure);
}
