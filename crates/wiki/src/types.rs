//! Retrieval types.

use serde::{Deserialize, Serialize};

/// One full-text search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,

    /// Raw search excerpt; may contain highlight markup
    pub snippet: String,

    pub url: String,

    #[serde(rename = "pageId")]
    pub page_id: i64,
}

/// An article fetched for one answer.
///
/// Transient: lives for a single `answer_question` call and is never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedArticle {
    pub title: String,

    /// Short lead summary
    pub extract: String,

    /// Non-empty lines of the full article text, filled in only when the
    /// delegate summarizer needs more than the extract
    #[serde(default)]
    pub full_content_lines: Vec<String>,

    pub url: String,

    #[serde(rename = "pageId")]
    pub page_id: i64,

    /// Section headings, best effort
    #[serde(default)]
    pub sections: Vec<String>,
}

impl RetrievedArticle {
    /// Build an article with no full content or sections yet.
    pub fn new(
        title: impl Into<String>,
        extract: impl Into<String>,
        url: impl Into<String>,
        page_id: i64,
    ) -> Self {
        Self {
            title: title.into(),
            extract: extract.into(),
            full_content_lines: Vec::new(),
            url: url.into(),
            page_id,
            sections: Vec::new(),
        }
    }

    /// Up to `max` non-empty trimmed lines of the full content, or of the
    /// extract when no full content was fetched.
    pub fn content_lines(&self, max: usize) -> Vec<String> {
        let source: Vec<&str> = if self.full_content_lines.is_empty() {
            self.extract.lines().collect()
        } else {
            self.full_content_lines.iter().map(String::as_str).collect()
        };

        source
            .into_iter()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(max)
            .map(str::to_string)
            .collect()
    }
}

/// Split raw article text into its non-empty trimmed lines.
pub fn non_empty_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
