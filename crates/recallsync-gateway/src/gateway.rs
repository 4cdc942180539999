//! HTTP implementation of the remote gateway port
//!
//! One method per backend endpoint; the [`ApiClient`] owns all request
//! plumbing and error normalization. Endpoint shapes:
//!
//! - `POST /decks`, `GET /decks`, `GET|PUT|DELETE /decks/{id}`
//! - `POST /cards`, `GET /cards?deckId=`, `GET|PUT|DELETE /cards/{id}`
//! - `GET /study/next?deckId=&limit=`
//! - `GET /study/{cardId}`
//! - `POST /study/review`

use serde::Serialize;

use recallsync_core::domain::{Card, CardId, Deck, DeckId, Quality, StudyItem, StudyProgress};
use recallsync_core::ports::{
    CardDraft, CardPatch, DeckDraft, DeckPatch, GatewayErrorKind, GatewayResult, RemoteGateway,
};

use crate::client::ApiClient;

/// Review grading request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewRequest {
    card_id: CardId,
    quality: Quality,
}

/// The backend REST API as a [`RemoteGateway`]
pub struct HttpRemoteGateway {
    client: ApiClient,
}

impl HttpRemoteGateway {
    /// Wraps an API client
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl RemoteGateway for HttpRemoteGateway {
    async fn create_deck(&self, draft: &DeckDraft) -> GatewayResult<Deck> {
        self.client.post_json("/decks", draft).await
    }

    async fn update_deck(&self, id: DeckId, patch: &DeckPatch) -> GatewayResult<Deck> {
        self.client.put_json(&format!("/decks/{id}"), patch).await
    }

    async fn delete_deck(&self, id: DeckId) -> GatewayResult<()> {
        self.client.delete(&format!("/decks/{id}")).await
    }

    async fn get_deck(&self, id: DeckId) -> GatewayResult<Deck> {
        self.client.get_json(&format!("/decks/{id}")).await
    }

    async fn list_decks(&self) -> GatewayResult<Vec<Deck>> {
        self.client.get_json("/decks").await
    }

    async fn create_card(&self, draft: &CardDraft) -> GatewayResult<Card> {
        self.client.post_json("/cards", draft).await
    }

    async fn update_card(&self, id: CardId, patch: &CardPatch) -> GatewayResult<Card> {
        self.client.put_json(&format!("/cards/{id}"), patch).await
    }

    async fn delete_card(&self, id: CardId) -> GatewayResult<()> {
        self.client.delete(&format!("/cards/{id}")).await
    }

    async fn get_card(&self, id: CardId) -> GatewayResult<Card> {
        self.client.get_json(&format!("/cards/{id}")).await
    }

    async fn list_cards(&self, deck_id: DeckId) -> GatewayResult<Vec<Card>> {
        self.client.get_json(&format!("/cards?deckId={deck_id}")).await
    }

    async fn get_next_due(&self, deck_id: DeckId, limit: u32) -> GatewayResult<Vec<StudyItem>> {
        self.client
            .get_json(&format!("/study/next?deckId={deck_id}&limit={limit}"))
            .await
    }

    async fn get_progress(&self, card_id: CardId) -> GatewayResult<Option<StudyProgress>> {
        // A card that has never been reviewed has no progress record; the
        // backend answers 404 and callers see that as an ordinary None
        match self.client.get_json(&format!("/study/{card_id}")).await {
            Ok(progress) => Ok(Some(progress)),
            Err(err) if err.kind == GatewayErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn review_card(&self, card_id: CardId, quality: Quality) -> GatewayResult<StudyProgress> {
        self.client
            .post_json("/study/review", &ReviewRequest { card_id, quality })
            .await
    }
}
