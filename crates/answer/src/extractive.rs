//! Extractive synthesis: build an answer from article sentences without a
//! language model.
//!
//! Sentences are scored by how many question keywords they contain, then the
//! best ones are stitched together in score order. Deterministic for a given
//! question and article list.

use crate::types::{MAX_ANSWER_CHARS, NO_COHERENT_ANSWER_MESSAGE};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use wikiqa_wiki::{clean_text, truncate_with_ellipsis, RetrievedArticle};

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("word regex is valid"));
static SENTENCE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("sentence terminator regex is valid"));

const STOP_WORDS: [&str; 39] = [
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will", "would",
    "could", "should", "what", "when", "where", "why", "how", "who", "which", "that", "this",
];

/// Top-scored sentences considered for an answer.
const MAX_SENTENCES: usize = 5;

/// Sentences this short (in characters) are never selected.
const MIN_SENTENCE_CHARS: usize = 20;

/// Sentences taken from the first article when nothing scores.
const FALLBACK_SENTENCES: usize = 3;

/// Lowercased word tokens of the question minus stop words and tokens of two
/// characters or fewer. Repeats are kept.
pub fn extract_keywords(question: &str) -> Vec<String> {
    let lowered = question.to_lowercase();
    WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|word| word.chars().count() > 2 && !STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}

/// Split on runs of `.`, `!` or `?`, trimming and dropping empty pieces.
pub fn split_into_sentences(text: &str) -> Vec<String> {
    SENTENCE_END_RE
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Number of keywords that occur as substrings of the lowercased sentence.
pub fn score_sentence(sentence: &str, keywords: &[String]) -> usize {
    let lowered = sentence.to_lowercase();
    keywords
        .iter()
        .filter(|keyword| lowered.contains(keyword.as_str()))
        .count()
}

/// Compose an answer from the articles' extracts.
///
/// Takes the five best-scoring sentences (ties in text order) and keeps the
/// distinct ones longer than 20 characters. When none survive, falls back to
/// the opening sentences of the first article, then to a fixed message.
pub fn synthesize(question: &str, articles: &[RetrievedArticle]) -> String {
    let keywords = extract_keywords(question);

    let mut combined = String::new();
    for article in articles {
        combined.push_str(&format!(
            "\n\n{}:\n{}",
            article.title,
            clean_text(&article.extract)
        ));
    }

    let sentences = split_into_sentences(&combined);
    let mut scored: Vec<(usize, &str)> = sentences
        .iter()
        .map(|s| (score_sentence(s, &keywords), s.as_str()))
        .filter(|(score, _)| *score > 0)
        .collect();
    // Stable, so equal scores stay in text order
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    // Short or repeated sentences among the top scores are dropped, not replaced
    let mut seen = HashSet::new();
    let selected: Vec<&str> = scored
        .into_iter()
        .take(MAX_SENTENCES)
        .map(|(_, sentence)| sentence)
        .filter(|sentence| sentence.chars().count() > MIN_SENTENCE_CHARS && seen.insert(*sentence))
        .collect();

    tracing::debug!(?keywords, selected = selected.len(), "Scored article sentences");

    let text = if !selected.is_empty() {
        selected.join(" ")
    } else {
        let fallback: Vec<String> = articles
            .first()
            .map(|article| {
                split_into_sentences(&clean_text(&article.extract))
                    .into_iter()
                    .take(FALLBACK_SENTENCES)
                    .collect()
            })
            .unwrap_or_default();

        if fallback.is_empty() {
            return NO_COHERENT_ANSWER_MESSAGE.to_string();
        }
        fallback.join(" ")
    };

    truncate_with_ellipsis(&clean_text(&text), MAX_ANSWER_CHARS)
}
