//! Prompt system for the WikiQA delegate summarizer.
//!
//! This crate provides:
//! - Built-in prompt definitions for summarization and question rewriting
//! - Per-workspace YAML overrides (`.wikiqa/prompts/<id>.yml`)
//! - Handlebars template rendering

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{builtin_prompt, load_prompt, REWRITE_PROMPT_ID, SUMMARIZE_PROMPT_ID};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptBehavior, PromptDefinition};
