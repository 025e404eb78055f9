//! Text normalization for article and snippet text.

use regex::Regex;
use std::sync::LazyLock;

static REFERENCE_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\d+\]").expect("reference marker regex is valid"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag regex is valid"));

/// Entities that show up in search snippets.
const ENTITIES: [(&str, &str); 7] = [
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&#039;", "'"),
    ("&apos;", "'"),
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
];

/// Remove reference markers like `[12]`, collapse whitespace runs, strip
/// markup tags and trim.
pub fn clean_text(text: &str) -> String {
    let text = REFERENCE_MARKER_RE.replace_all(text, "");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    let text = TAG_RE.replace_all(&text, "");
    text.trim().to_string()
}

/// Strip markup tags and decode the common HTML entities.
///
/// `&amp;` is decoded last so an escaped entity is not decoded twice.
pub fn strip_html(text: &str) -> String {
    let mut out = TAG_RE.replace_all(text, "").into_owned();
    for (entity, replacement) in ENTITIES {
        out = out.replace(entity, replacement);
    }
    // Decoded angle brackets may have formed new tags
    let out = TAG_RE.replace_all(&out, "").into_owned();
    out.replace("&amp;", "&")
}

/// Hard-truncate to `max_chars` characters, ending in `...` when cut.
///
/// Counts characters rather than bytes so multi-byte text is never split.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let keep = max_chars.saturating_sub(3);
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str("...");
    truncated
}

/// Display form of a snippet: markup removed, normalized, bounded.
pub fn clean_snippet(snippet: &str, max_chars: usize) -> String {
    truncate_with_ellipsis(&clean_text(&strip_html(snippet)), max_chars)
}
