//! Context command handler.
//!
//! Shows the stored memory of one conversation.

use super::{open_store, print_json};
use clap::Args;
use wikiqa_answer::ContextStore;
use wikiqa_core::{config::AppConfig, AppResult};

/// Show the stored context of a conversation
#[derive(Args, Debug)]
pub struct ContextCommand {
    /// Conversation id
    pub conversation: String,

    /// Installation id scoping the conversation
    #[arg(long)]
    pub installation: i64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ContextCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing context command");

        let store = open_store(config)?;
        let context = store.get(&self.conversation, self.installation).await?;

        if self.json {
            return print_json(&context);
        }

        match context {
            Some(context) => {
                println!("Conversation: {}", context.conversation_id);
                println!("Installation: {}", context.installation_id);
                println!("Turns:        {}", context.turn_count);
                println!("Updated:      {}", context.last_updated_at.to_rfc3339());
                println!();
                println!("Last question: {}", context.last_question);
                println!("Last answer:   {}", context.last_answer);
            }
            None => println!(
                "No context stored for conversation '{}' (installation {})",
                self.conversation, self.installation
            ),
        }

        Ok(())
    }
}
