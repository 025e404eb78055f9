//! Ask command handler.
//!
//! Answers one question through the full engine and prints the answer with
//! its sources.

use super::{open_store, print_json, wikipedia};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use wikiqa_answer::{
    format_for_display, AnswerEngine, ContextStore, DelegateSummarizer, EngineOptions,
    ExchangeLog, InMemoryContextStore, LlmDelegate, QaExchange, RetrievalGateway,
};
use wikiqa_core::{config::AppConfig, AppError, AppResult};
use wikiqa_llm::{create_client, factory::DEFAULT_TIMEOUT_SECS};

/// Ask a question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Option<String>,

    /// Read the question from a file
    #[arg(short, long, conflicts_with = "question")]
    pub file: Option<PathBuf>,

    /// Conversation id for follow-up memory (e.g. T123_C456)
    #[arg(long, requires = "installation")]
    pub conversation: Option<String>,

    /// Installation id scoping the conversation
    #[arg(long)]
    pub installation: Option<i64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Keep conversation memory in-process instead of the database
    #[arg(long)]
    pub ephemeral: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let question = self
            .get_question()
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| AppError::Config("No question provided".to_string()))?;

        let gateway = wikipedia(config)?;
        let delegate = build_delegate(config)?;
        let options = EngineOptions {
            search_limit: config.wiki.search_limit,
        };

        if self.ephemeral {
            let store = Arc::new(InMemoryContextStore::new());
            self.answer(&question, gateway, delegate, options, store).await
        } else {
            let store = open_store(config)?;
            self.answer(&question, gateway, delegate, options, store).await
        }
    }

    async fn answer<S>(
        &self,
        question: &str,
        gateway: Arc<dyn RetrievalGateway>,
        delegate: Arc<dyn DelegateSummarizer>,
        options: EngineOptions,
        store: Arc<S>,
    ) -> AppResult<()>
    where
        S: ContextStore + ExchangeLog + 'static,
    {
        let engine = AnswerEngine::new(gateway, delegate, store.clone()).with_options(options);
        let answer = engine
            .answer_question(question, self.conversation.as_deref(), self.installation)
            .await;

        if let Some(installation) = self.installation {
            let exchange = QaExchange::new(
                installation,
                self.conversation.as_deref(),
                question,
                answer.text.as_str(),
                answer.citations.clone(),
            );
            if let Err(e) = store.record_exchange(&exchange).await {
                tracing::warn!("Failed to record exchange: {}", e);
            }
        }

        if self.json {
            print_json(&answer)
        } else {
            println!("{}{}", answer.text, format_for_display(&answer.citations));
            Ok(())
        }
    }

    fn get_question(&self) -> Option<String> {
        self.question.clone().or_else(|| {
            self.file.as_ref().and_then(|path| {
                std::fs::read_to_string(path)
                    .map_err(|e| tracing::error!("Failed to read question file: {}", e))
                    .ok()
            })
        })
    }
}

/// LLM-backed delegate for the configured provider.
///
/// A missing API key is not an error here; the delegate reports it on first
/// use and the engine falls back to extractive answers.
fn build_delegate(config: &AppConfig) -> AppResult<Arc<dyn DelegateSummarizer>> {
    let provider_config = config.get_provider_config(&config.provider);
    let endpoint = provider_config.as_ref().and_then(|pc| pc.endpoint());
    let timeout = provider_config
        .as_ref()
        .and_then(|pc| pc.timeout())
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    let api_key = config.resolve_api_key(&config.provider);

    if api_key.is_none() && config.provider == "openai" {
        tracing::info!("No API key configured, answers will be extractive");
    }

    let client = create_client(&config.provider, endpoint, api_key.as_deref(), timeout)?;
    let delegate = LlmDelegate::new(client, &config.model).with_workspace(&config.workspace);
    Ok(Arc::new(delegate))
}
