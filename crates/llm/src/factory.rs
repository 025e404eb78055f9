//! LLM provider factory.
//!
//! Builds an LLM client from configuration values: resolves the provider
//! name, picks the endpoint and applies the per-call timeout.

use crate::client::LlmClient;
use crate::providers::{ollama::DEFAULT_OLLAMA_URL, openai::DEFAULT_OPENAI_URL};
use crate::providers::{OllamaClient, OpenAiClient};
use crate::types::ProviderType;
use std::sync::Arc;
use wikiqa_core::{AppError, AppResult};

/// Default per-call timeout for delegate requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("openai", "ollama")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - Optional API key; OpenAI checks it lazily on each call
/// * `timeout_secs` - Per-request timeout
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown or the HTTP client
/// cannot be built.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
    timeout_secs: u64,
) -> AppResult<Arc<dyn LlmClient>> {
    let provider_type: ProviderType = provider.parse()?;
    tracing::debug!(provider = %provider_type, ?endpoint, timeout_secs, "Creating LLM client");

    match provider_type {
        ProviderType::Ollama => {
            let base_url = endpoint.unwrap_or(DEFAULT_OLLAMA_URL);
            let client = OllamaClient::with_timeout(base_url, timeout_secs)
                .map_err(|e| AppError::Config(e.to_string()))?;
            Ok(Arc::new(client))
        }
        ProviderType::OpenAI => {
            let base_url = endpoint.unwrap_or(DEFAULT_OPENAI_URL);
            let client =
                OpenAiClient::new(base_url, api_key.map(str::to_string), timeout_secs)
                    .map_err(|e| AppError::Config(e.to_string()))?;
            Ok(Arc::new(client))
        }
    }
}
