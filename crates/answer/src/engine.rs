//! Answer orchestration.
//!
//! Drives one question through retrieval, summarization and memory. Never
//! fails outward: every collaborator failure degrades to a fallback branch.

use crate::context::{ContextStore, ConversationContext};
use crate::delegate::DelegateSummarizer;
use crate::extractive;
use crate::rewriter;
use crate::types::{Answer, AnswerPath, Citation};
use std::sync::Arc;
use tracing::Instrument;
use wikiqa_wiki::{non_empty_lines, RetrievalGateway, RetrievedArticle, SearchResult};

/// Search hits fetched as articles, and articles cited.
pub const MAX_ARTICLES: usize = 2;

/// Article lines handed to the delegate.
pub const MAX_CONTENT_LINES: usize = 10;

/// Search hits requested per question.
pub const DEFAULT_SEARCH_LIMIT: usize = 3;

/// Tunables for [`AnswerEngine`].
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub search_limit: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

/// Answers questions from an encyclopedia with conversation memory.
///
/// Holds no per-request state; one engine can serve concurrent questions.
pub struct AnswerEngine {
    gateway: Arc<dyn RetrievalGateway>,
    delegate: Arc<dyn DelegateSummarizer>,
    store: Arc<dyn ContextStore>,
    options: EngineOptions,
}

impl AnswerEngine {
    pub fn new(
        gateway: Arc<dyn RetrievalGateway>,
        delegate: Arc<dyn DelegateSummarizer>,
        store: Arc<dyn ContextStore>,
    ) -> Self {
        Self {
            gateway,
            delegate,
            store,
            options: EngineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Answer a question.
    ///
    /// Conversation memory is read and written only when both ids are given.
    pub async fn answer_question(
        &self,
        question: &str,
        conversation_id: Option<&str>,
        installation_id: Option<i64>,
    ) -> Answer {
        let span = tracing::info_span!(
            "answer_question",
            conversation_id = conversation_id.unwrap_or("-"),
            installation_id = installation_id.unwrap_or_default()
        );

        async {
            let answer = self.run(question, conversation_id, installation_id).await;
            tracing::info!(
                path = answer.path.as_str(),
                citations = answer.citations.len(),
                chars = answer.text.chars().count(),
                "Answered question"
            );
            answer
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        question: &str,
        conversation_id: Option<&str>,
        installation_id: Option<i64>,
    ) -> Answer {
        let key = conversation_id.zip(installation_id);

        let context = match key {
            Some((conversation, installation)) => self.load_context(conversation, installation).await,
            None => None,
        };

        let query =
            rewriter::effective_question(self.delegate.as_ref(), question, context.as_ref()).await;

        let results = self.gateway.search(&query, self.options.search_limit).await;
        if results.is_empty() {
            tracing::info!(query = %query, "No search results");
            return Answer::no_results(conversation_id);
        }

        let (mut articles, citations) = self.fetch_articles(&results).await;
        if articles.is_empty() {
            tracing::info!(hits = results.len(), "No article could be fetched");
            let citations = results
                .iter()
                .take(MAX_ARTICLES)
                .map(Citation::from_search_result)
                .collect();
            return Answer::no_content(citations, conversation_id);
        }

        let context_text = context.as_ref().map(ConversationContext::as_prompt_context);
        let delegated = self
            .delegate_answer(&query, &mut articles, context_text.as_deref())
            .await;
        let (text, path) = match delegated {
            Some(text) => (text, AnswerPath::Delegated),
            None => (
                extractive::synthesize(question, &articles),
                AnswerPath::Extractive,
            ),
        };

        let answer = Answer::new(&text, citations, conversation_id, path);

        if let Some((conversation, installation)) = key {
            if let Err(e) = self
                .store
                .upsert(conversation, installation, question, &answer.text)
                .await
            {
                tracing::warn!(error = %e, "Failed to store conversation context");
            }
        }

        answer
    }

    async fn load_context(
        &self,
        conversation_id: &str,
        installation_id: i64,
    ) -> Option<ConversationContext> {
        match self.store.get(conversation_id, installation_id).await {
            Ok(context) => context,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load conversation context");
                None
            }
        }
    }

    /// Fetch the leading hits in search order, citing each one fetched.
    async fn fetch_articles(
        &self,
        results: &[SearchResult],
    ) -> (Vec<RetrievedArticle>, Vec<Citation>) {
        let mut articles = Vec::new();
        let mut citations = Vec::new();

        for hit in results.iter().take(MAX_ARTICLES) {
            match self.gateway.fetch_article(&hit.title).await {
                Some(article) => {
                    citations.push(Citation::from_article(&article, hit));
                    articles.push(article);
                }
                None => tracing::debug!(title = %hit.title, "Article unavailable"),
            }
        }

        (articles, citations)
    }

    /// First non-empty delegate summary over the fetched articles.
    async fn delegate_answer(
        &self,
        question: &str,
        articles: &mut [RetrievedArticle],
        context: Option<&str>,
    ) -> Option<String> {
        for article in articles.iter_mut().take(MAX_ARTICLES) {
            if let Some(content) = self.gateway.fetch_full_content(&article.title).await {
                article.full_content_lines = non_empty_lines(&content);
            }

            let lines = article.content_lines(MAX_CONTENT_LINES);
            if lines.is_empty() {
                continue;
            }

            match self
                .delegate
                .summarize(question, &lines, &article.url, context)
                .await
            {
                Ok(text) if !text.trim().is_empty() => return Some(text.trim().to_string()),
                Ok(_) => tracing::debug!(title = %article.title, "Delegate returned no text"),
                Err(e) => tracing::warn!(title = %article.title, error = %e, "Delegate summary failed"),
            }
        }

        None
    }
}
