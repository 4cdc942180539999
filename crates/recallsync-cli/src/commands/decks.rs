//! Deck commands - list, show, create, update, delete

use anyhow::Result;
use clap::Subcommand;

use recallsync_core::domain::{DeckId, DeckTitle, Mutation};

use crate::commands::AppContext;
use crate::output::Printer;

#[derive(Debug, Subcommand)]
pub enum DecksCommand {
    /// List all decks
    List,
    /// Show a single deck
    Show {
        /// Deck id
        id: DeckId,
    },
    /// Create a new deck
    Create {
        /// Deck title (1-200 characters)
        title: String,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
    },
    /// Update a deck's title and/or description
    Update {
        /// Deck id
        id: DeckId,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a deck and all its cards
    Delete {
        /// Deck id
        id: DeckId,
    },
}

impl DecksCommand {
    pub async fn execute(&self, ctx: &AppContext, printer: &Printer) -> Result<()> {
        match self {
            DecksCommand::List => {
                let decks = ctx.gateway.list_decks().await?;
                printer.json(&decks);
                for deck in &decks {
                    printer.deck_line(deck);
                }
                if !printer.is_json() && decks.is_empty() {
                    printer.info("no decks yet");
                }
                Ok(())
            }
            DecksCommand::Show { id } => {
                let deck = ctx.gateway.get_deck(*id).await?;
                printer.json(&deck);
                printer.deck_line(&deck);
                if let Some(description) = deck.description() {
                    printer.info(description);
                }
                Ok(())
            }
            DecksCommand::Create { title, description } => {
                let title = DeckTitle::new(title.clone())?;
                let outcome = ctx
                    .coordinator
                    .execute(Mutation::CreateDeck {
                        title,
                        description: description.clone(),
                    })
                    .await?;
                if let Some(deck) = outcome.into_deck() {
                    printer.json(&deck);
                    printer.success(&format!("created deck {}", deck.id()));
                }
                Ok(())
            }
            DecksCommand::Update {
                id,
                title,
                description,
            } => {
                let title = title.clone().map(DeckTitle::new).transpose()?;
                let outcome = ctx
                    .coordinator
                    .execute(Mutation::UpdateDeck {
                        id: *id,
                        title,
                        description: description.clone(),
                    })
                    .await?;
                if let Some(deck) = outcome.into_deck() {
                    printer.json(&deck);
                    printer.success(&format!("updated deck {}", deck.id()));
                }
                Ok(())
            }
            DecksCommand::Delete { id } => {
                ctx.coordinator
                    .execute(Mutation::DeleteDeck { id: *id })
                    .await?;
                printer.success(&format!("deleted deck {id}"));
                Ok(())
            }
        }
    }
}
