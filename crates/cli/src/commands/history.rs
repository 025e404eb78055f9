//! History command handler.
//!
//! Lists answered questions recorded for an installation.

use super::{open_store, print_json};
use clap::Args;
use wikiqa_answer::ExchangeLog;
use wikiqa_core::{config::AppConfig, AppResult};

/// List recently answered questions
#[derive(Args, Debug)]
pub struct HistoryCommand {
    /// Installation id
    #[arg(long)]
    pub installation: i64,

    /// Maximum number of exchanges to show
    #[arg(short, long, default_value = "10")]
    pub limit: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl HistoryCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing history command");

        let store = open_store(config)?;
        let exchanges = store
            .recent_exchanges(self.installation, self.limit)
            .await?;

        if self.json {
            return print_json(&exchanges);
        }

        if exchanges.is_empty() {
            println!("No exchanges recorded for installation {}", self.installation);
            return Ok(());
        }

        for exchange in &exchanges {
            println!(
                "[{}] {}",
                exchange.created_at.format("%Y-%m-%d %H:%M:%S"),
                exchange.question
            );
            if let Some(ref conversation) = exchange.conversation_id {
                println!("  conversation: {}", conversation);
            }
            println!("  {}", exchange.answer);
            for citation in &exchange.citations {
                println!("  - {} ({})", citation.title, citation.url);
            }
            println!();
        }

        Ok(())
    }
}
