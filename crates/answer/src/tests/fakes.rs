//! Test doubles for the engine's collaborators.

use crate::context::{ContextStore, ConversationContext};
use crate::delegate::DelegateSummarizer;
use std::collections::HashMap;
use std::sync::Mutex;
use wikiqa_core::{AppError, AppResult};
use wikiqa_wiki::{RetrievalGateway, RetrievedArticle, SearchResult};

pub fn hit(title: &str, snippet: &str, page_id: i64) -> SearchResult {
    SearchResult {
        title: title.to_string(),
        snippet: snippet.to_string(),
        url: format!("https://en.wikipedia.org/wiki/{}", title.replace(' ', "_")),
        page_id,
    }
}

pub fn article(title: &str, extract: &str, page_id: i64) -> RetrievedArticle {
    RetrievedArticle::new(
        title,
        extract,
        format!("https://en.wikipedia.org/wiki/{}", title.replace(' ', "_")),
        page_id,
    )
}

/// Gateway serving canned hits and articles, recording every call.
#[derive(Default)]
pub struct FakeGateway {
    pub results: Vec<SearchResult>,
    pub articles: HashMap<String, RetrievedArticle>,
    pub full_content: HashMap<String, String>,
    pub queries: Mutex<Vec<(String, usize)>>,
    pub fetched: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn with_results(mut self, results: Vec<SearchResult>) -> Self {
        self.results = results;
        self
    }

    pub fn with_article(mut self, article: RetrievedArticle) -> Self {
        self.articles.insert(article.title.clone(), article);
        self
    }

    pub fn with_full_content(mut self, title: &str, content: &str) -> Self {
        self.full_content.insert(title.to_string(), content.to_string());
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().iter().map(|(q, _)| q.clone()).collect()
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl RetrievalGateway for FakeGateway {
    async fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        self.queries.lock().unwrap().push((query.to_string(), limit));
        self.results.iter().take(limit).cloned().collect()
    }

    async fn fetch_article(&self, title: &str) -> Option<RetrievedArticle> {
        self.fetched.lock().unwrap().push(title.to_string());
        self.articles.get(title).cloned()
    }

    async fn fetch_full_content(&self, title: &str) -> Option<String> {
        self.full_content.get(title).cloned()
    }
}

/// What the fake delegate does when asked to summarize.
#[derive(Clone)]
pub enum Reply {
    Text(String),
    Fail,
}

/// Summarizer replaying scripted replies in order; the last one repeats.
pub struct FakeDelegate {
    summaries: Vec<Reply>,
    rewrite: Reply,
    pub summarize_calls: Mutex<Vec<SummarizeCall>>,
    pub rewrite_calls: Mutex<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct SummarizeCall {
    pub question: String,
    pub lines: Vec<String>,
    pub url: String,
    pub context: Option<String>,
}

impl FakeDelegate {
    pub fn new(summaries: Vec<Reply>, rewrite: Reply) -> Self {
        Self {
            summaries,
            rewrite,
            summarize_calls: Mutex::new(Vec::new()),
            rewrite_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(vec![Reply::Text(text.to_string())], Reply::Fail)
    }

    pub fn failing() -> Self {
        Self::new(vec![Reply::Fail], Reply::Fail)
    }

    pub fn summarize_calls(&self) -> Vec<SummarizeCall> {
        self.summarize_calls.lock().unwrap().clone()
    }

    pub fn rewrite_calls(&self) -> Vec<String> {
        self.rewrite_calls.lock().unwrap().clone()
    }
}

fn play(reply: &Reply) -> AppResult<String> {
    match reply {
        Reply::Text(text) => Ok(text.clone()),
        Reply::Fail => Err(AppError::Delegate("OPENAI_API_KEY is not configured".to_string())),
    }
}

#[async_trait::async_trait]
impl DelegateSummarizer for FakeDelegate {
    async fn summarize(
        &self,
        question: &str,
        content_lines: &[String],
        source_url: &str,
        context: Option<&str>,
    ) -> AppResult<String> {
        let mut calls = self.summarize_calls.lock().unwrap();
        let reply = self
            .summaries
            .get(calls.len())
            .or(self.summaries.last())
            .cloned()
            .unwrap_or(Reply::Fail);
        calls.push(SummarizeCall {
            question: question.to_string(),
            lines: content_lines.to_vec(),
            url: source_url.to_string(),
            context: context.map(str::to_string),
        });
        play(&reply)
    }

    async fn rewrite_question(
        &self,
        question: &str,
        _context: &ConversationContext,
    ) -> AppResult<String> {
        self.rewrite_calls.lock().unwrap().push(question.to_string());
        play(&self.rewrite)
    }
}

/// Store whose every operation fails.
pub struct BrokenStore;

#[async_trait::async_trait]
impl ContextStore for BrokenStore {
    async fn get(&self, _: &str, _: i64) -> AppResult<Option<ConversationContext>> {
        Err(AppError::ContextStore("database is locked".to_string()))
    }

    async fn upsert(&self, _: &str, _: i64, _: &str, _: &str) -> AppResult<()> {
        Err(AppError::ContextStore("database is locked".to_string()))
    }
}
