//! Answer and citation types.

use serde::{Deserialize, Serialize};
use wikiqa_wiki::{clean_snippet, truncate_with_ellipsis, RetrievedArticle, SearchResult};

/// Upper bound on answer text, in characters.
pub const MAX_ANSWER_CHARS: usize = 1000;

/// Upper bound on a citation snippet, in characters.
pub const MAX_SNIPPET_CHARS: usize = 120;

/// Returned when search finds nothing.
pub const NO_RESULTS_MESSAGE: &str = "I couldn't find any relevant information about that topic on Wikipedia. Could you try rephrasing your question?";

/// Returned when search finds pages but none can be fetched.
pub const NO_CONTENT_MESSAGE: &str = "I found some search results but couldn't retrieve the detailed content. Please try asking a more specific question.";

/// Returned when articles were fetched but no sentence could be selected.
pub const NO_COHERENT_ANSWER_MESSAGE: &str = "I found some information but couldn't generate a coherent answer. Please try asking a more specific question.";

/// A source reference attached to an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub title: String,

    pub url: String,

    /// Cleaned, markup-free excerpt of at most 120 characters
    pub snippet: String,

    #[serde(rename = "pageId")]
    pub page_id: i64,
}

impl Citation {
    /// Build a citation, cleaning and bounding the snippet.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: &str,
        page_id: i64,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: clean_snippet(snippet, MAX_SNIPPET_CHARS),
            page_id,
        }
    }

    /// Cite a fetched article, quoting the search hit that led to it.
    pub fn from_article(article: &RetrievedArticle, hit: &SearchResult) -> Self {
        Self::new(&article.title, &article.url, &hit.snippet, article.page_id)
    }

    /// Cite a search hit whose article could not be fetched.
    pub fn from_search_result(hit: &SearchResult) -> Self {
        Self::new(&hit.title, &hit.url, &hit.snippet, hit.page_id)
    }
}

/// Which branch of the pipeline produced an answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerPath {
    /// Search returned nothing
    NoResults,

    /// Search hits existed but no article could be fetched
    NoContent,

    /// The delegate summarizer wrote the answer
    Delegated,

    /// Built from article sentences locally
    #[default]
    Extractive,
}

impl AnswerPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerPath::NoResults => "no_results",
            AnswerPath::NoContent => "no_content",
            AnswerPath::Delegated => "delegated",
            AnswerPath::Extractive => "extractive",
        }
    }
}

/// Result of answering one question.
///
/// Always produced, even when retrieval or summarization fail; the text then
/// carries one of the fixed fallback messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    /// At most 1000 characters
    pub text: String,

    /// At most two entries, in search order
    pub citations: Vec<Citation>,

    pub conversation_id: Option<String>,

    /// Internal: the branch taken, for logging and tests
    #[serde(skip)]
    pub path: AnswerPath,
}

impl Answer {
    /// Create an answer, bounding its text.
    pub fn new(
        text: &str,
        citations: Vec<Citation>,
        conversation_id: Option<&str>,
        path: AnswerPath,
    ) -> Self {
        Self {
            text: truncate_with_ellipsis(text, MAX_ANSWER_CHARS),
            citations,
            conversation_id: conversation_id.map(str::to_string),
            path,
        }
    }

    /// The fixed reply for a search with no hits.
    pub fn no_results(conversation_id: Option<&str>) -> Self {
        Self::new(
            NO_RESULTS_MESSAGE,
            Vec::new(),
            conversation_id,
            AnswerPath::NoResults,
        )
    }

    /// The fixed reply when no hit could be fetched.
    pub fn no_content(citations: Vec<Citation>, conversation_id: Option<&str>) -> Self {
        Self::new(
            NO_CONTENT_MESSAGE,
            citations,
            conversation_id,
            AnswerPath::NoContent,
        )
    }
}
