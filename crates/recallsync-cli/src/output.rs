//! CLI output formatting

use recallsync_core::domain::{Card, Deck};

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Formats command results in the selected output mode
pub struct Printer {
    format: OutputFormat,
}

impl Printer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("\u{2713} {message}"),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"success": true, "message": message}));
            }
        }
    }

    pub fn error(&self, message: &str) {
        match self.format {
            OutputFormat::Human => eprintln!("\u{2717} Error: {message}"),
            OutputFormat::Json => {
                eprintln!("{}", serde_json::json!({"success": false, "error": message}));
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.format == OutputFormat::Human {
            println!("  {message}");
        }
    }

    /// Prints a serializable value as pretty JSON (JSON mode only)
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if self.format == OutputFormat::Json {
            match serde_json::to_string_pretty(value) {
                Ok(text) => println!("{text}"),
                Err(err) => eprintln!("{}", serde_json::json!({"error": err.to_string()})),
            }
        }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// One deck per line: id, title, card count
    pub fn deck_line(&self, deck: &Deck) {
        if self.format == OutputFormat::Human {
            println!(
                "{}  {}  ({} cards)",
                deck.id(),
                deck.title().as_str(),
                deck.cards_count()
            );
        }
    }

    /// One card per line: id and a truncated front
    pub fn card_line(&self, card: &Card) {
        if self.format == OutputFormat::Human {
            let front = card.front().as_str();
            let preview: String = front.chars().take(60).collect();
            let ellipsis = if front.chars().count() > 60 { "\u{2026}" } else { "" };
            println!("{}  {preview}{ellipsis}", card.id());
        }
    }
}
