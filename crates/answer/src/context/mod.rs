//! Conversation memory and the exchange log.

mod memory;
mod sqlite;

pub use memory::InMemoryContextStore;
pub use sqlite::SqliteContextStore;

use crate::types::Citation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wikiqa_core::AppResult;

/// Most recent exchange of one conversation within one installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationContext {
    pub conversation_id: String,
    pub installation_id: i64,
    pub last_question: String,
    pub last_answer: String,

    /// Number of answered turns, starting at 1
    pub turn_count: i64,

    pub last_updated_at: DateTime<Utc>,
}

impl ConversationContext {
    /// The previous exchange as prompt text.
    pub fn as_prompt_context(&self) -> String {
        format!(
            "Previous question: {}\nPrevious answer: {}",
            self.last_question, self.last_answer
        )
    }
}

/// Persistent per-conversation memory keyed by
/// `(conversation_id, installation_id)`.
#[async_trait::async_trait]
pub trait ContextStore: Send + Sync {
    /// Context for the pair, `None` when never stored.
    async fn get(
        &self,
        conversation_id: &str,
        installation_id: i64,
    ) -> AppResult<Option<ConversationContext>>;

    /// Record a turn: creates the row with `turn_count = 1`, or replaces the
    /// question and answer and increments the count. Atomic per key.
    async fn upsert(
        &self,
        conversation_id: &str,
        installation_id: i64,
        question: &str,
        answer: &str,
    ) -> AppResult<()>;
}

/// One answered question, kept for history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaExchange {
    pub installation_id: i64,
    pub conversation_id: Option<String>,
    pub question: String,
    pub answer: String,
    pub citations: Vec<Citation>,
    pub created_at: DateTime<Utc>,
}

impl QaExchange {
    pub fn new(
        installation_id: i64,
        conversation_id: Option<&str>,
        question: impl Into<String>,
        answer: impl Into<String>,
        citations: Vec<Citation>,
    ) -> Self {
        Self {
            installation_id,
            conversation_id: conversation_id.map(str::to_string),
            question: question.into(),
            answer: answer.into(),
            citations,
            created_at: Utc::now(),
        }
    }
}

/// Append-only record of answered questions.
#[async_trait::async_trait]
pub trait ExchangeLog: Send + Sync {
    async fn record_exchange(&self, exchange: &QaExchange) -> AppResult<()>;

    /// Newest first.
    async fn recent_exchanges(&self, installation_id: i64, limit: usize)
        -> AppResult<Vec<QaExchange>>;
}

/// Conversation id for a chat thread: `"<team>_<channel>"`, with
/// `"_<user>"` appended for per-user threads.
pub fn conversation_id(team_id: &str, channel_id: &str, user_id: Option<&str>) -> String {
    match user_id {
        Some(user) => format!("{}_{}_{}", team_id, channel_id, user),
        None => format!("{}_{}", team_id, channel_id),
    }
}
