//! Wikipedia implementation of the retrieval gateway.
//!
//! Search and full content go through the MediaWiki action API; summaries
//! and sections through the REST API.

use crate::gateway::RetrievalGateway;
use crate::types::{RetrievedArticle, SearchResult};
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;
use wikiqa_core::config::WikiConfig;
use wikiqa_core::{AppError, AppResult};

const USER_AGENT: &str = concat!("wikiqa/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
    #[serde(default)]
    snippet: String,
    pageid: i64,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    title: String,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    pageid: i64,
    #[serde(default)]
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: DesktopUrls,
}

#[derive(Debug, Deserialize)]
struct DesktopUrls {
    page: String,
}

#[derive(Debug, Deserialize)]
struct SectionsResponse {
    #[serde(default)]
    sections: Vec<Section>,
}

#[derive(Debug, Deserialize)]
struct Section {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct ExtractsResponse {
    #[serde(default)]
    query: Option<ExtractsQuery>,
}

#[derive(Debug, Deserialize)]
struct ExtractsQuery {
    #[serde(default)]
    pages: std::collections::HashMap<String, ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    #[serde(default)]
    extract: Option<String>,
}

/// HTTP client for Wikipedia.
///
/// Holds one pooled `reqwest::Client`; every request reuses its connections
/// and is bounded by the configured timeout.
pub struct WikipediaClient {
    config: WikiConfig,
    client: reqwest::Client,
}

impl WikipediaClient {
    /// Create a client from retrieval settings.
    pub fn new(config: WikiConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Canonical page link for a title.
    pub fn page_url(&self, title: &str) -> String {
        format!(
            "{}/{}",
            self.config.page_url.trim_end_matches('/'),
            title.replace(' ', "_")
        )
    }

    /// `<rest_url>/page/<kind>/<title>`, with the title percent-encoded.
    fn rest_url(&self, kind: &str, title: &str) -> AppResult<Url> {
        let mut url = Url::parse(&self.config.rest_url)
            .map_err(|e| AppError::Config(format!("Invalid REST URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Config("REST URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["page", kind, title.replace(' ', "_").as_str()]);
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> AppResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::Retrieval(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Retrieval(format!("Wikipedia returned {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Retrieval(format!("Failed to parse response: {}", e)))
    }

    async fn try_search(&self, query: &str, limit: usize) -> AppResult<Vec<SearchResult>> {
        let limit = limit.to_string();
        let request = self.client.get(&self.config.api_url).query(&[
            ("action", "query"),
            ("format", "json"),
            ("list", "search"),
            ("srsearch", query),
            ("srlimit", limit.as_str()),
            ("srprop", "snippet"),
        ]);

        let response: SearchResponse = self.get_json(request).await?;
        Ok(self.convert_search(response))
    }

    fn convert_search(&self, response: SearchResponse) -> Vec<SearchResult> {
        response
            .query
            .map(|q| q.search)
            .unwrap_or_default()
            .into_iter()
            .map(|hit| SearchResult {
                url: self.page_url(&hit.title),
                title: hit.title,
                snippet: hit.snippet,
                page_id: hit.pageid,
            })
            .collect()
    }

    async fn try_fetch_article(&self, title: &str) -> AppResult<Option<RetrievedArticle>> {
        let url = self.rest_url("summary", title)?;
        let summary: SummaryResponse = self.get_json(self.client.get(url)).await?;

        let Some(mut article) = self.convert_summary(summary) else {
            return Ok(None);
        };

        article.sections = self.fetch_sections(title).await;
        Ok(Some(article))
    }

    fn convert_summary(&self, summary: SummaryResponse) -> Option<RetrievedArticle> {
        let extract = summary.extract?;
        let url = summary
            .content_urls
            .map(|urls| urls.desktop.page)
            .unwrap_or_else(|| self.page_url(&summary.title));

        Some(RetrievedArticle::new(summary.title, extract, url, summary.pageid))
    }

    /// Section headings; empty on any failure.
    async fn fetch_sections(&self, title: &str) -> Vec<String> {
        let result: AppResult<SectionsResponse> = match self.rest_url("sections", title) {
            Ok(url) => self.get_json(self.client.get(url)).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(response) => response
                .sections
                .into_iter()
                .map(|s| s.title)
                .filter(|t| !t.is_empty())
                .collect(),
            Err(e) => {
                tracing::debug!(title, error = %e, "Section lookup failed");
                Vec::new()
            }
        }
    }

    async fn try_fetch_full_content(&self, title: &str) -> AppResult<Option<String>> {
        let request = self.client.get(&self.config.api_url).query(&[
            ("action", "query"),
            ("format", "json"),
            ("titles", title),
            ("prop", "extracts"),
            ("explaintext", "1"),
            ("exsectionformat", "plain"),
        ]);

        let response: ExtractsResponse = self.get_json(request).await?;
        Ok(convert_extracts(response))
    }
}

/// First existing page's extract; page id `-1` marks a missing page.
fn convert_extracts(response: ExtractsResponse) -> Option<String> {
    response.query.and_then(|q| {
        q.pages
            .into_iter()
            .find(|(page_id, _)| page_id != "-1")
            .map(|(_, page)| page.extract.unwrap_or_default())
    })
}

#[async_trait::async_trait]
impl RetrievalGateway for WikipediaClient {
    async fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        match self.try_search(query, limit).await {
            Ok(results) => {
                tracing::debug!(query, count = results.len(), "Search completed");
                results
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "Search failed");
                Vec::new()
            }
        }
    }

    async fn fetch_article(&self, title: &str) -> Option<RetrievedArticle> {
        match self.try_fetch_article(title).await {
            Ok(article) => article,
            Err(e) => {
                tracing::warn!(title, error = %e, "Article fetch failed");
                None
            }
        }
    }

    async fn fetch_full_content(&self, title: &str) -> Option<String> {
        match self.try_fetch_full_content(title).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(title, error = %e, "Full content fetch failed");
                None
            }
        }
    }
}
