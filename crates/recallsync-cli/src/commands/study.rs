//! Study commands - interactive review loop and due counts

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use clap::Subcommand;

use recallsync_core::domain::DeckId;
use recallsync_study::{SessionError, SessionPhase, StudySessionController};

use crate::commands::AppContext;
use crate::output::Printer;

#[derive(Debug, Subcommand)]
pub enum StudyCommand {
    /// Study the due cards of a deck interactively
    Run {
        /// Deck id
        deck_id: DeckId,
        /// Maximum cards to fetch for this session
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show how many cards are currently due in a deck
    Due {
        /// Deck id
        deck_id: DeckId,
    },
}

impl StudyCommand {
    pub async fn execute(&self, ctx: &AppContext, printer: &Printer) -> Result<()> {
        match self {
            StudyCommand::Run { deck_id, limit } => {
                let limit = limit.unwrap_or(ctx.config.study.default_limit);
                let session = StudySessionController::load(
                    *deck_id,
                    limit,
                    ctx.gateway.as_ref(),
                    Arc::clone(&ctx.store),
                    Arc::clone(&ctx.coordinator),
                )
                .await
                .map_err(|err| anyhow::anyhow!("failed to start session: {err}"))?;
                run_session(session, printer).await
            }
            StudyCommand::Due { deck_id } => {
                let items = ctx
                    .gateway
                    .get_next_due(*deck_id, ctx.config.study.due_count_probe_limit)
                    .await?;
                let due = items.len();
                printer.json(&serde_json::json!({ "deckId": deck_id, "due": due }));
                if !printer.is_json() {
                    println!("{due} cards due");
                }
                Ok(())
            }
        }
    }
}

/// Reveal-and-grade loop over stdin
///
/// Enter reveals the back, `0`-`5` grades the card, `q` ends the session
/// early. A failed grade keeps the card on screen for a retry.
async fn run_session(mut session: StudySessionController, printer: &Printer) -> Result<()> {
    if session.phase() == SessionPhase::Finished {
        printer.success("nothing due, you're all caught up");
        return Ok(());
    }
    println!("{} cards due\n", session.queue_len());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while session.phase() != SessionPhase::Finished {
        let item = match session.current() {
            Some(item) => item,
            None => break,
        };
        println!(
            "[{}/{}] {}",
            session.cursor() + 1,
            session.queue_len(),
            item.card().front().as_str()
        );
        print!("(enter to reveal, q to quit) ");
        io::stdout().flush()?;
        match lines.next() {
            Some(Ok(line)) if line.trim() == "q" => break,
            Some(Ok(_)) => {}
            _ => break,
        }
        session.reveal()?;
        let item = session.current().map(|i| i.card().back().as_str().to_string());
        if let Some(back) = item {
            println!("-> {back}");
        }

        loop {
            print!("grade 0-5 (q to quit): ");
            io::stdout().flush()?;
            let input = match lines.next() {
                Some(Ok(line)) => line,
                _ => return Ok(()),
            };
            let input = input.trim();
            if input == "q" {
                return Ok(());
            }
            let Ok(quality) = input.parse::<u8>() else {
                printer.error("enter a number between 0 and 5");
                continue;
            };
            match session.submit_quality(quality).await {
                Ok(_) => break,
                Err(SessionError::Domain(err)) => {
                    printer.error(&err.to_string());
                }
                Err(SessionError::Gateway(err)) => {
                    // Session state is unchanged; the user decides
                    printer.error(&format!("grade not saved: {err} (retry or q)"));
                }
                Err(err) => {
                    printer.error(&err.to_string());
                    return Ok(());
                }
            }
        }
    }

    printer.success("session finished");
    Ok(())
}
