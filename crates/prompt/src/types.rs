//! Prompt definitions and their rendered form.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A delegate prompt, built in or read from a `.yml` override.
///
/// ```yaml
/// id: answer.summarize
/// title: Summarize article lines
/// apiVersion: "1.0"
/// behavior:
///   temperature: 0.4
///   maxTokens: 400
/// system: You rewrite Wikipedia notes into clear summaries.
/// template: |
///   User question: {{question}}
///   ...
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptDefinition {
    pub id: String,
    pub title: String,

    /// `major.minor`
    pub api_version: String,

    #[serde(default)]
    pub behavior: PromptBehavior,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Handlebars source
    pub template: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptBehavior {
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.4
}

impl Default for PromptBehavior {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: None,
        }
    }
}

/// A rendered prompt, ready to become an LLM request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    pub system: Option<String>,
    pub user: String,
    pub behavior: PromptBehavior,
    pub metadata: BuiltPromptMetadata,
}

/// What went into a [`BuiltPrompt`], for logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltPromptMetadata {
    pub source_prompt_id: String,

    /// A non-blank `context` variable was supplied
    pub context_included: bool,

    pub resolved_variables: HashMap<String, String>,
}
