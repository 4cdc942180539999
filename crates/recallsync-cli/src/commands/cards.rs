//! Card commands - list, show, create, update, delete

use anyhow::Result;
use clap::Subcommand;

use recallsync_core::domain::{CardFace, CardId, DeckId, Mutation};

use crate::commands::AppContext;
use crate::output::Printer;

#[derive(Debug, Subcommand)]
pub enum CardsCommand {
    /// List all cards in a deck
    List {
        /// Deck id
        deck_id: DeckId,
    },
    /// Show a single card
    Show {
        /// Card id
        id: CardId,
    },
    /// Create a new card in a deck
    Create {
        /// Deck id
        deck_id: DeckId,
        /// Front side (question), markdown allowed
        front: String,
        /// Back side (answer), markdown allowed
        back: String,
    },
    /// Update a card's faces
    Update {
        /// Card id
        id: CardId,
        /// New front side
        #[arg(long)]
        front: Option<String>,
        /// New back side
        #[arg(long)]
        back: Option<String>,
    },
    /// Delete a card
    Delete {
        /// Card id
        id: CardId,
    },
}

impl CardsCommand {
    pub async fn execute(&self, ctx: &AppContext, printer: &Printer) -> Result<()> {
        match self {
            CardsCommand::List { deck_id } => {
                let cards = ctx.gateway.list_cards(*deck_id).await?;
                printer.json(&cards);
                for card in &cards {
                    printer.card_line(card);
                }
                if !printer.is_json() && cards.is_empty() {
                    printer.info("no cards in this deck");
                }
                Ok(())
            }
            CardsCommand::Show { id } => {
                let card = ctx.gateway.get_card(*id).await?;
                printer.json(&card);
                if !printer.is_json() {
                    println!("front: {}", card.front().as_str());
                    println!("back:  {}", card.back().as_str());
                }
                Ok(())
            }
            CardsCommand::Create {
                deck_id,
                front,
                back,
            } => {
                let front = CardFace::new(front.clone())?;
                let back = CardFace::new(back.clone())?;
                let outcome = ctx
                    .coordinator
                    .execute(Mutation::CreateCard {
                        deck_id: *deck_id,
                        front,
                        back,
                    })
                    .await?;
                if let Some(card) = outcome.into_card() {
                    printer.json(&card);
                    printer.success(&format!("created card {}", card.id()));
                }
                Ok(())
            }
            CardsCommand::Update { id, front, back } => {
                let front = front.clone().map(CardFace::new).transpose()?;
                let back = back.clone().map(CardFace::new).transpose()?;
                let outcome = ctx
                    .coordinator
                    .execute(Mutation::UpdateCard {
                        id: *id,
                        front,
                        back,
                    })
                    .await?;
                if let Some(card) = outcome.into_card() {
                    printer.json(&card);
                    printer.success(&format!("updated card {}", card.id()));
                }
                Ok(())
            }
            CardsCommand::Delete { id } => {
                ctx.coordinator
                    .execute(Mutation::DeleteCard { id: *id })
                    .await?;
                printer.success(&format!("deleted card {id}"));
                Ok(())
            }
        }
    }
}
