//! Prompt loader: built-in definitions with optional YAML overrides.

use crate::types::{PromptBehavior, PromptDefinition};
use std::path::Path;
use wikiqa_core::{AppError, AppResult};

/// Prompt used to turn article lines into an answer.
pub const SUMMARIZE_PROMPT_ID: &str = "answer.summarize";

/// Prompt used to expand an ambiguous follow-up question.
pub const REWRITE_PROMPT_ID: &str = "answer.rewrite";

const SUMMARIZE_SYSTEM: &str = "You rewrite Wikipedia notes into clear summaries.";

const SUMMARIZE_TEMPLATE: &str = "You are an editor turning Wikipedia notes into a friendly answer.
Instructions:
1. Write 5-10 sentences in plain language that answer the user's question.
2. Base the answer only on the provided lines from Wikipedia.
3. Avoid markdown unless needed for clarity.
User question: {{question}}
{{#if context}}Recent conversation context to keep in mind:
{{context}}

{{/if}}Wikipedia lines ({{url}}):
{{content}}
";

const REWRITE_SYSTEM: &str = "You turn follow-up questions into standalone search questions.";

const REWRITE_TEMPLATE: &str = "Rewrite the follow-up question so it can be understood without the conversation.
Resolve pronouns and vague references using the previous exchange.
Reply with the rewritten question only.

{{context}}

Follow-up question: {{question}}
";

/// Return the built-in definition for a prompt ID.
pub fn builtin_prompt(prompt_id: &str) -> Option<PromptDefinition> {
    match prompt_id {
        SUMMARIZE_PROMPT_ID => Some(PromptDefinition {
            id: SUMMARIZE_PROMPT_ID.to_string(),
            title: "Summarize article lines".to_string(),
            api_version: "1.0".to_string(),
            behavior: PromptBehavior {
                temperature: 0.4,
                max_tokens: None,
            },
            system: Some(SUMMARIZE_SYSTEM.to_string()),
            template: SUMMARIZE_TEMPLATE.to_string(),
        }),
        REWRITE_PROMPT_ID => Some(PromptDefinition {
            id: REWRITE_PROMPT_ID.to_string(),
            title: "Rewrite follow-up question".to_string(),
            api_version: "1.0".to_string(),
            behavior: PromptBehavior {
                temperature: 0.0,
                max_tokens: Some(100),
            },
            system: Some(REWRITE_SYSTEM.to_string()),
            template: REWRITE_TEMPLATE.to_string(),
        }),
        _ => None,
    }
}

/// Load a prompt definition by ID.
///
/// When a workspace is given and `<workspace>/.wikiqa/prompts/<id>.yml`
/// exists, the file wins; otherwise the built-in definition is returned.
///
/// # Example
/// ```no_run
/// use wikiqa_prompt::{load_prompt, SUMMARIZE_PROMPT_ID};
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Some(Path::new(".")), SUMMARIZE_PROMPT_ID)?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: Option<&Path>, prompt_id: &str) -> AppResult<PromptDefinition> {
    if let Some(workspace) = workspace_path {
        let prompt_file = workspace
            .join(".wikiqa/prompts")
            .join(format!("{}.yml", prompt_id));

        if prompt_file.exists() {
            tracing::debug!("Loading prompt override from: {:?}", prompt_file);

            let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
                AppError::Prompt(format!("Failed to read prompt file {:?}: {}", prompt_file, e))
            })?;

            let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
                AppError::Prompt(format!("Failed to parse prompt YAML {:?}: {}", prompt_file, e))
            })?;

            validate_prompt(&definition)?;

            tracing::info!("Loaded prompt override: {} ({})", definition.id, definition.title);
            return Ok(definition);
        }
    }

    builtin_prompt(prompt_id)
        .ok_or_else(|| AppError::Prompt(format!("Unknown prompt: {}", prompt_id)))
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    if !(0.0..=2.0).contains(&def.behavior.temperature) {
        return Err(AppError::Prompt(format!(
            "Temperature out of range for {}: {}",
            def.id, def.behavior.temperature
        )));
    }

    Ok(())
}
