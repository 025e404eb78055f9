//! The retrieval contract consumed by the answer engine.

use crate::types::{RetrievedArticle, SearchResult};

/// Search and fetch over an encyclopedia corpus.
///
/// Implementations own their transport and its timeout. None of these calls
/// may fail outward: transport problems are logged and collapse to an empty
/// sequence or `None`.
#[async_trait::async_trait]
pub trait RetrievalGateway: Send + Sync {
    /// Full-text search, best match first.
    async fn search(&self, query: &str, limit: usize) -> Vec<SearchResult>;

    /// Fetch an article's lead extract; `None` when not found or unreachable.
    async fn fetch_article(&self, title: &str) -> Option<RetrievedArticle>;

    /// Fetch the full plain-text article body.
    async fn fetch_full_content(&self, title: &str) -> Option<String>;
}
