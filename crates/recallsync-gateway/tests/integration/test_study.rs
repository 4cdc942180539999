//! Study endpoint tests

use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use recallsync_core::domain::{CardId, DeckId, Quality};
use recallsync_core::ports::{GatewayErrorKind, RemoteGateway};

use crate::common;

#[tokio::test]
async fn test_get_next_due_passes_deck_and_limit() {
    let (server, gateway) = common::setup_gateway().await;
    let deck_id = Uuid::new_v4();
    let card_id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path("/study/next"))
        .and(query_param("deckId", deck_id.to_string()))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::study_item_body(card_id, deck_id, "due question"),
        ])))
        .mount(&server)
        .await;

    let items = gateway
        .get_next_due(DeckId::from(deck_id), 50)
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].card_id(), CardId::from(card_id));
    assert_eq!(items[0].card().front().as_str(), "due question");
    assert_eq!(items[0].progress().review_count(), 1);
}

#[tokio::test]
async fn test_get_next_due_empty_queue() {
    let (server, gateway) = common::setup_gateway().await;
    let deck_id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path("/study/next"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let items = gateway
        .get_next_due(DeckId::from(deck_id), 10)
        .await
        .unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_get_progress_returns_record() {
    let (server, gateway) = common::setup_gateway().await;
    let card_id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path(format!("/study/{card_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::progress_body(card_id)))
        .mount(&server)
        .await;

    let progress = gateway.get_progress(CardId::from(card_id)).await.unwrap();
    let progress = progress.unwrap();
    assert_eq!(progress.card_id(), CardId::from(card_id));
    assert!((progress.ease_factor() - 2.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_get_progress_for_unreviewed_card_is_none() {
    let (server, gateway) = common::setup_gateway().await;
    let card_id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path(format!("/study/{card_id}")))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(common::error_body("ProgressNotFound", "never reviewed")),
        )
        .mount(&server)
        .await;

    let progress = gateway.get_progress(CardId::from(card_id)).await.unwrap();
    assert!(progress.is_none());
}

#[tokio::test]
async fn test_review_posts_quality_and_returns_reschedule() {
    let (server, gateway) = common::setup_gateway().await;
    let card_id = Uuid::new_v4();
    Mock::given(method("POST"))
        .and(path("/study/review"))
        .and(body_partial_json(json!({
            "cardId": card_id.to_string(),
            "quality": 4
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::progress_body(card_id)))
        .mount(&server)
        .await;

    let progress = gateway
        .review_card(CardId::from(card_id), Quality::new(4).unwrap())
        .await
        .unwrap();
    assert_eq!(progress.card_id(), CardId::from(card_id));
}

#[tokio::test]
async fn test_review_missing_card_maps_to_not_found() {
    let (server, gateway) = common::setup_gateway().await;
    let card_id = Uuid::new_v4();
    Mock::given(method("POST"))
        .and(path("/study/review"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(common::error_body("CardNotFound", "no such card")),
        )
        .mount(&server)
        .await;

    let err = gateway
        .review_card(CardId::from(card_id), Quality::new(0).unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.kind, GatewayErrorKind::NotFound);
}
