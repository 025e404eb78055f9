//! Error types for WikiQA.
//!
//! This module defines a unified error enum covering every failure category
//! in the answer pipeline and its collaborators. Most of them are soft: the
//! answer engine degrades to a fallback path instead of surfacing them.

use thiserror::Error;

/// Unified error type for WikiQA.
///
/// All fallible functions return `Result<T, AppError>`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Article search/fetch failures
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Delegate summarizer or question rewriter failures
    #[error("Delegate error: {0}")]
    Delegate(String),

    /// Conversation context persistence failures
    #[error("Context store error: {0}")]
    ContextStore(String),

    /// LLM provider transport errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Prompt loading/rendering errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Re-tag any error as a delegate failure, keeping its message.
    ///
    /// Used at the summarizer boundary so missing credentials surface to the
    /// orchestrator as `Delegate` rather than `Config`.
    pub fn into_delegate(self) -> AppError {
        match self {
            AppError::Delegate(msg) => AppError::Delegate(msg),
            other => AppError::Delegate(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
