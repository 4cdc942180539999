//! recallsync CLI - Command-line interface for recallsync
//!
//! Provides commands for:
//! - Managing decks and cards
//! - Studying due cards interactively
//! - Checking due counts

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{cards::CardsCommand, decks::DecksCommand, study::StudyCommand, AppContext};
use output::{OutputFormat, Printer};

#[derive(Debug, Parser)]
#[command(name = "recallsync", version, about = "Spaced-repetition flashcards from the terminal")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage decks
    #[command(subcommand)]
    Decks(DecksCommand),
    /// Manage cards
    #[command(subcommand)]
    Cards(CardsCommand),
    /// Study due cards
    #[command(subcommand)]
    Study(StudyCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    let printer = Printer::new(format);

    let ctx = AppContext::init(cli.config.as_deref())?;
    ctx.spawn_refetch_worker();

    let result = match cli.command {
        Commands::Decks(cmd) => cmd.execute(&ctx, &printer).await,
        Commands::Cards(cmd) => cmd.execute(&ctx, &printer).await,
        Commands::Study(cmd) => cmd.execute(&ctx, &printer).await,
    };

    if let Err(err) = &result {
        printer.error(&format!("{err:#}"));
        std::process::exit(1);
    }
    Ok(())
}
