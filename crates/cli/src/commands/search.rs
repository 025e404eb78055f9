//! Search command handler.
//!
//! Runs a bare Wikipedia search, without fetching or summarizing articles.

use super::{print_json, wikipedia};
use clap::Args;
use wikiqa_core::{config::AppConfig, AppResult};
use wikiqa_wiki::{clean_text, strip_html, RetrievalGateway, SearchResult};

/// Search Wikipedia and list the hits
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Search query
    pub query: String,

    /// Maximum number of hits (default: wiki.searchLimit)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing search command");

        let limit = self.limit.unwrap_or(config.wiki.search_limit);
        let client = wikipedia(config)?;
        let results: Vec<SearchResult> = client
            .search(&self.query, limit)
            .await
            .into_iter()
            .map(|hit| SearchResult {
                snippet: clean_text(&strip_html(&hit.snippet)),
                ..hit
            })
            .collect();

        tracing::debug!("Search returned {} hits", results.len());

        if self.json {
            return print_json(&results);
        }

        if results.is_empty() {
            println!("No results for \"{}\"", self.query);
            return Ok(());
        }

        for (i, hit) in results.iter().enumerate() {
            println!("{}. {} ({})", i + 1, hit.title, hit.url);
            if !hit.snippet.is_empty() {
                println!("   {}", hit.snippet);
            }
        }

        Ok(())
    }
}
