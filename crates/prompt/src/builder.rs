//! Prompt builder for rendering templates.

use crate::types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition};
use handlebars::Handlebars;
use std::collections::HashMap;
use wikiqa_core::{AppError, AppResult};

/// Build a prompt from a definition and input variables.
///
/// A `context` variable, when present and non-blank, enables the
/// `{{#if context}}` sections of the template. Blank values are dropped so
/// the section stays hidden.
///
/// # Example
/// ```no_run
/// use wikiqa_prompt::{build_prompt, builtin_prompt, SUMMARIZE_PROMPT_ID};
/// use std::collections::HashMap;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let def = builtin_prompt(SUMMARIZE_PROMPT_ID).unwrap();
/// let mut vars = HashMap::new();
/// vars.insert("question".to_string(), "What is Rust?".to_string());
///
/// let built = build_prompt(&def, vars)?;
/// println!("User prompt: {}", built.user);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    mut variables: HashMap<String, String>,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    variables.retain(|key, value| key != "context" || !value.trim().is_empty());
    let context_included = variables.contains_key("context");

    let user = render_template(&definition.template, &variables)?;

    Ok(BuiltPrompt {
        system: definition.system.clone(),
        user,
        behavior: definition.behavior.clone(),
        metadata: BuiltPromptMetadata {
            source_prompt_id: definition.id.clone(),
            context_included,
            resolved_variables: variables,
        },
    })
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Article text is plain text, never HTML
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{builtin_prompt, REWRITE_PROMPT_ID, SUMMARIZE_PROMPT_ID};

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_simple_template() {
        let result = render_template("Question: {{question}}", &vars(&[("question", "Hello")]));
        assert_eq!(result.unwrap(), "Question: Hello");
    }

    #[test]
    fn test_no_html_escaping() {
        let result = render_template("{{content}}", &vars(&[("content", "A & B <i>")]));
        assert_eq!(result.unwrap(), "A & B <i>");
    }

    #[test]
    fn test_summarize_prompt_without_context() {
        let def = builtin_prompt(SUMMARIZE_PROMPT_ID).unwrap();
        let built = build_prompt(
            &def,
            vars(&[
                ("question", "What is Rust?"),
                ("content", "Rust is a language."),
                ("url", "https://en.wikipedia.org/wiki/Rust"),
                ("context", "   "),
            ]),
        )
        .unwrap();

        assert!(built.user.contains("User question: What is Rust?"));
        assert!(built.user.contains("Rust is a language."));
        assert!(!built.user.contains("Recent conversation context"));
        assert!(!built.metadata.context_included);
        assert_eq!(built.system.as_deref(), def.system.as_deref());
    }

    #[test]
    fn test_summarize_prompt_with_context() {
        let def = builtin_prompt(SUMMARIZE_PROMPT_ID).unwrap();
        let built = build_prompt(
            &def,
            vars(&[
                ("question", "When was it founded?"),
                ("content", "line"),
                ("url", "u"),
                ("context", "Previous answer: Oxford is a university."),
            ]),
        )
        .unwrap();

        assert!(built.user.contains("Recent conversation context to keep in mind:"));
        assert!(built.user.contains("Oxford is a university."));
        assert!(built.metadata.context_included);
    }

    #[test]
    fn test_rewrite_prompt_renders_question() {
        let def = builtin_prompt(REWRITE_PROMPT_ID).unwrap();
        let built = build_prompt(
            &def,
            vars(&[("question", "What about its history?"), ("context", "Previous question: What is Oxford?")]),
        )
        .unwrap();

        assert!(built.user.contains("Follow-up question: What about its history?"));
        assert_eq!(built.behavior.temperature, 0.0);
    }

    #[test]
    fn test_render_template_missing_variable() {
        // Handlebars renders missing variables as empty string
        let result = render_template("Question: {{missing}}", &HashMap::new());
        assert_eq!(result.unwrap(), "Question: ");
    }
}
