//! Follow-up question rewriting.

use crate::context::ConversationContext;
use crate::delegate::DelegateSummarizer;

/// Questions with this many words or fewer count as ambiguous.
const SHORT_QUESTION_WORDS: usize = 4;

const PRONOUNS: [&str; 13] = [
    "it", "they", "them", "this", "that", "those", "these", "he", "she", "him", "her", "there",
    "their",
];

/// Whether a question likely leans on earlier turns: four words or fewer, or
/// a pronoun as a whole word.
pub fn needs_rewrite(question: &str) -> bool {
    let lowered = question.trim().to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    if words.len() <= SHORT_QUESTION_WORDS {
        return true;
    }

    words
        .iter()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .any(|w| PRONOUNS.contains(&w))
}

/// The question to search with.
///
/// Rewrites through the delegate only when there is prior context and the
/// question looks ambiguous. Any delegate failure keeps the original.
pub async fn effective_question(
    delegate: &dyn DelegateSummarizer,
    question: &str,
    context: Option<&ConversationContext>,
) -> String {
    let Some(context) = context else {
        return question.to_string();
    };
    if !needs_rewrite(question) {
        return question.to_string();
    }

    match delegate.rewrite_question(question, context).await {
        Ok(rewritten) if !rewritten.trim().is_empty() => {
            tracing::debug!(original = question, rewritten = %rewritten, "Rewrote follow-up question");
            rewritten.trim().to_string()
        }
        Ok(_) => question.to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Question rewrite failed, keeping original");
            question.to_string()
        }
    }
}
