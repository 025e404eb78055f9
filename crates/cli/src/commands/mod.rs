//! Command handlers for the WikiQA CLI.

pub mod ask;
pub mod context;
pub mod history;
pub mod search;

pub use ask::AskCommand;
pub use context::ContextCommand;
pub use history::HistoryCommand;
pub use search::SearchCommand;

use std::sync::Arc;
use wikiqa_answer::SqliteContextStore;
use wikiqa_core::{config::AppConfig, AppError, AppResult};
use wikiqa_wiki::WikipediaClient;

/// Open the conversation database named by the configuration.
pub(crate) fn open_store(config: &AppConfig) -> AppResult<Arc<SqliteContextStore>> {
    Ok(Arc::new(SqliteContextStore::open(&config.database_path())?))
}

pub(crate) fn wikipedia(config: &AppConfig) -> AppResult<Arc<WikipediaClient>> {
    Ok(Arc::new(WikipediaClient::new(config.wiki.clone())?))
}

pub(crate) fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Serialization(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
