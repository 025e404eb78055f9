//! Chat-ready rendering of citations.

use crate::types::{Citation, MAX_SNIPPET_CHARS};
use wikiqa_wiki::clean_snippet;

/// Render citations as a "Sources" block in chat link markup.
///
/// Each line reads `- <url|title> — snippet`; the snippet part is left out
/// when it is empty after cleaning. No citations render as an empty string.
pub fn format_for_display(citations: &[Citation]) -> String {
    if citations.is_empty() {
        return String::new();
    }

    let mut out = String::from("\n\n*Sources:*\n");
    for citation in citations {
        out.push_str(&format!("- <{}|{}>", citation.url, citation.title));

        let snippet = clean_snippet(&citation.snippet, MAX_SNIPPET_CHARS);
        if !snippet.is_empty() {
            out.push_str(" — ");
            out.push_str(&snippet);
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_citations_render_nothing() {
        assert_eq!(format_for_display(&[]), "");
    }

    #[test]
    fn test_single_citation() {
        let citation = Citation::new(
            "Rust (programming language)",
            "https://en.wikipedia.org/wiki/Rust_(programming_language)",
            "Rust is a general-purpose programming language",
            29414838,
        );

        assert_eq!(
            format_for_display(&[citation]),
            "\n\n*Sources:*\n- <https://en.wikipedia.org/wiki/Rust_(programming_language)|Rust (programming language)> — Rust is a general-purpose programming language\n"
        );
    }

    #[test]
    fn test_blank_snippet_is_omitted() {
        let citation = Citation::new("Rust", "https://en.wikipedia.org/wiki/Rust", "<b> </b>", 1);
        let rendered = format_for_display(&[citation]);

        assert!(rendered.ends_with("- <https://en.wikipedia.org/wiki/Rust|Rust>\n"));
        assert!(!rendered.contains(" — "));
    }

    #[test]
    fn test_citation_order_is_kept() {
        let citations = vec![
            Citation::new("First", "u1", "one", 1),
            Citation::new("Second", "u2", "two", 2),
        ];
        let rendered = format_for_display(&citations);

        let first = rendered.find("First").unwrap();
        let second = rendered.find("Second").unwrap();
        assert!(first < second);
    }
}
