//! Delegate summarizer: the language-model side of answering.

use crate::context::ConversationContext;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use wikiqa_core::{AppError, AppResult};
use wikiqa_llm::{LlmClient, LlmRequest};
use wikiqa_prompt::{build_prompt, load_prompt, BuiltPrompt, REWRITE_PROMPT_ID, SUMMARIZE_PROMPT_ID};

/// External summarizer used for answers and question rewrites.
///
/// Either call may fail with `AppError::Delegate`; an empty result is a
/// failure too. The engine treats both as soft and falls back.
#[async_trait::async_trait]
pub trait DelegateSummarizer: Send + Sync {
    /// Summarize article lines into an answer to `question`.
    async fn summarize(
        &self,
        question: &str,
        content_lines: &[String],
        source_url: &str,
        context: Option<&str>,
    ) -> AppResult<String>;

    /// Rewrite a follow-up into a standalone question.
    async fn rewrite_question(
        &self,
        question: &str,
        context: &ConversationContext,
    ) -> AppResult<String>;
}

/// [`DelegateSummarizer`] backed by an [`LlmClient`] and the built-in
/// prompts, optionally overridden from a workspace.
pub struct LlmDelegate {
    client: Arc<dyn LlmClient>,
    model: String,
    workspace: Option<PathBuf>,
}

impl LlmDelegate {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            workspace: None,
        }
    }

    /// Look for prompt overrides under `<workspace>/.wikiqa/prompts`.
    pub fn with_workspace(mut self, workspace: impl Into<PathBuf>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }

    fn build(&self, prompt_id: &str, variables: HashMap<String, String>) -> AppResult<BuiltPrompt> {
        let definition = load_prompt(self.workspace.as_deref(), prompt_id)?;
        build_prompt(&definition, variables)
    }

    async fn run(&self, prompt: BuiltPrompt) -> AppResult<String> {
        let mut request = LlmRequest::new(prompt.user, &self.model)
            .with_temperature(prompt.behavior.temperature);
        if let Some(system) = prompt.system {
            request = request.with_system(system);
        }
        if let Some(max_tokens) = prompt.behavior.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        tracing::debug!(
            provider = self.client.provider_name(),
            prompt_id = %prompt.metadata.source_prompt_id,
            context_included = prompt.metadata.context_included,
            "Calling delegate"
        );

        let response = self.client.complete(&request).await?;
        tracing::debug!(
            model = %response.model,
            total_tokens = response.usage.total_tokens,
            "Delegate replied"
        );
        let text = response.content.trim();
        if text.is_empty() {
            return Err(AppError::Delegate("Delegate returned no text".to_string()));
        }

        Ok(text.to_string())
    }
}

/// First non-blank line, without wrapping quotes.
fn clean_rewrite(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_string()
}

#[async_trait::async_trait]
impl DelegateSummarizer for LlmDelegate {
    async fn summarize(
        &self,
        question: &str,
        content_lines: &[String],
        source_url: &str,
        context: Option<&str>,
    ) -> AppResult<String> {
        let mut variables = HashMap::new();
        variables.insert("question".to_string(), question.to_string());
        variables.insert("content".to_string(), content_lines.join("\n"));
        variables.insert("url".to_string(), source_url.to_string());
        if let Some(context) = context {
            variables.insert("context".to_string(), context.to_string());
        }

        let prompt = self
            .build(SUMMARIZE_PROMPT_ID, variables)
            .map_err(AppError::into_delegate)?;
        self.run(prompt).await.map_err(AppError::into_delegate)
    }

    async fn rewrite_question(
        &self,
        question: &str,
        context: &ConversationContext,
    ) -> AppResult<String> {
        let mut variables = HashMap::new();
        variables.insert("question".to_string(), question.to_string());
        variables.insert("context".to_string(), context.as_prompt_context());

        let prompt = self
            .build(REWRITE_PROMPT_ID, variables)
            .map_err(AppError::into_delegate)?;
        let text = self.run(prompt).await.map_err(AppError::into_delegate)?;

        let rewritten = clean_rewrite(&text);
        if rewritten.is_empty() {
            return Err(AppError::Delegate("Rewrite was empty".to_string()));
        }
        Ok(rewritten)
    }
}
