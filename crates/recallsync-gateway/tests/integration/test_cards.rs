//! Card endpoint tests

use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use recallsync_core::domain::{CardFace, CardId, DeckId};
use recallsync_core::ports::{CardDraft, CardPatch, GatewayErrorKind, RemoteGateway};

use crate::common;

fn face(s: &str) -> CardFace {
    CardFace::new(s.to_string()).unwrap()
}

#[tokio::test]
async fn test_list_cards_filters_by_deck() {
    let (server, gateway) = common::setup_gateway().await;
    let deck_id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path("/cards"))
        .and(query_param("deckId", deck_id.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::card_body(Uuid::new_v4(), deck_id, "q1", "a1"),
            common::card_body(Uuid::new_v4(), deck_id, "q2", "a2"),
        ])))
        .mount(&server)
        .await;

    let cards = gateway.list_cards(DeckId::from(deck_id)).await.unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].front().as_str(), "q1");
    assert_eq!(cards[1].deck_id(), DeckId::from(deck_id));
}

#[tokio::test]
async fn test_create_card_posts_draft_with_deck_id() {
    let (server, gateway) = common::setup_gateway().await;
    let deck_id = Uuid::new_v4();
    let card_id = Uuid::new_v4();
    Mock::given(method("POST"))
        .and(path("/cards"))
        .and(body_partial_json(json!({
            "deckId": deck_id.to_string(),
            "front": "What is ownership?"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(common::card_body(
            card_id,
            deck_id,
            "What is ownership?",
            "A set of rules governing memory",
        )))
        .mount(&server)
        .await;

    let draft = CardDraft {
        deck_id: DeckId::from(deck_id),
        front: face("What is ownership?"),
        back: face("A set of rules governing memory"),
    };
    let card = gateway.create_card(&draft).await.unwrap();
    assert_eq!(card.id(), CardId::from(card_id));
}

#[tokio::test]
async fn test_update_card_sends_only_changed_faces() {
    let (server, gateway) = common::setup_gateway().await;
    let deck_id = Uuid::new_v4();
    let card_id = Uuid::new_v4();
    Mock::given(method("PUT"))
        .and(path(format!("/cards/{card_id}")))
        .and(body_partial_json(json!({ "front": "new front" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::card_body(
            card_id, deck_id, "new front", "old back",
        )))
        .mount(&server)
        .await;

    let patch = CardPatch {
        front: Some(face("new front")),
        back: None,
    };
    let card = gateway.update_card(CardId::from(card_id), &patch).await.unwrap();
    assert_eq!(card.front().as_str(), "new front");
}

#[tokio::test]
async fn test_delete_card() {
    let (server, gateway) = common::setup_gateway().await;
    let card_id = Uuid::new_v4();
    Mock::given(method("DELETE"))
        .and(path(format!("/cards/{card_id}")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    gateway.delete_card(CardId::from(card_id)).await.unwrap();
}

#[tokio::test]
async fn test_card_validation_error() {
    let (server, gateway) = common::setup_gateway().await;
    let deck_id = Uuid::new_v4();
    Mock::given(method("POST"))
        .and(path("/cards"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(common::error_body("CardValidation", "front exceeds 5000 chars")),
        )
        .mount(&server)
        .await;

    let draft = CardDraft {
        deck_id: DeckId::from(deck_id),
        front: face("q"),
        back: face("a"),
    };
    let err = gateway.create_card(&draft).await.unwrap_err();
    assert_eq!(err.kind, GatewayErrorKind::ValidationFailure);
    assert_eq!(err.message, "front exceeds 5000 chars");
}
