//! Retrieval gateway for WikiQA.
//!
//! Full-text search and article fetch over Wikipedia, plus the text
//! normalization applied to everything shown to a user.
//!
//! The [`RetrievalGateway`] trait is the contract the answer engine consumes;
//! [`WikipediaClient`] is the HTTP implementation. Transport failures never
//! cross the trait boundary: they collapse to empty results or `None`.

pub mod client;
pub mod gateway;
pub mod text;
pub mod types;

pub use client::WikipediaClient;
pub use gateway::RetrievalGateway;
pub use text::{clean_text, clean_snippet, strip_html, truncate_with_ellipsis};
pub use types::{non_empty_lines, RetrievedArticle, SearchResult};
