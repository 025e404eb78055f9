//! Answer synthesis engine.
//!
//! Turns a question (plus optional conversation memory) into a grounded
//! answer with citations:
//!
//! 1. Load the conversation context
//! 2. Rewrite ambiguous follow-ups through the delegate
//! 3. Search and fetch articles
//! 4. Summarize through the delegate, falling back to extractive synthesis
//! 5. Store the updated context
//!
//! Collaborators are injected as trait objects ([`RetrievalGateway`],
//! [`DelegateSummarizer`], [`ContextStore`]) so each can be replaced by a
//! test double.

pub mod citations;
pub mod context;
pub mod delegate;
pub mod engine;
pub mod extractive;
pub mod rewriter;
pub mod types;

#[cfg(test)]
mod tests;

pub use citations::format_for_display;
pub use context::{
    conversation_id, ContextStore, ConversationContext, ExchangeLog, InMemoryContextStore,
    QaExchange, SqliteContextStore,
};
pub use delegate::{DelegateSummarizer, LlmDelegate};
pub use engine::{AnswerEngine, EngineOptions};
pub use rewriter::needs_rewrite;
pub use types::{Answer, AnswerPath, Citation};
pub use wikiqa_wiki::RetrievalGateway;
