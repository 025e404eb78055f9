//! LLM integration crate for WikiQA.
//!
//! Provider-agnostic access to the language model behind the delegate
//! summarizer. Every provider implements [`LlmClient`].
//!
//! # Providers
//! - **OpenAI** (and OpenAI-compatible servers): `/v1/chat/completions`
//! - **Ollama**: local runtime, `/api/chat`
//!
//! # Example
//! ```no_run
//! use wikiqa_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("Who wrote Hamlet?", "llama3.2");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{OllamaClient, OpenAiClient};
pub use types::ProviderType;
