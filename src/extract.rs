// src/extract.rs
// =============================================================================
// Derives a title and a short description from a parsed page.
//
// Description fallback chain (first non-empty wins):
// 1. <meta name="description">
// 2. <meta property="og:description">
// 3. the first <p> with more than 20 characters of text
// 4. a fixed "no description" placeholder
//
// Every string that leaves this module has been sanitised: quotes, newlines
// and other control characters are replaced, whitespace is collapsed.
// Sanitising happens before truncation so the length limit is exact.
// =============================================================================

use crate::fetch::ParsedDocument;

// A paragraph must be longer than this to count as a description
pub const MIN_PARAGRAPH_CHARS: usize = 20;
pub const TITLE_PLACEHOLDER_PREFIX: &str = "Neural Node: ";
pub const NO_DESCRIPTION: &str = "No description available for this neural pathway.";
pub const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct ContentExtractor {
    desc_max_len: usize,
}

impl ContentExtractor {
    pub fn new(desc_max_len: usize) -> Self {
        Self { desc_max_len }
    }

    pub fn extract(&self, document: &ParsedDocument) -> Extracted {
        let title = match sanitize(&document.title) {
            title if title.is_empty() => sanitize(&format!("{TITLE_PLACEHOLDER_PREFIX}{}", document.url)),
            title => title,
        };

        let description = [
            document.meta_name("description").map(sanitize),
            document.meta_property("og:description").map(sanitize),
            document
                .first_paragraph(|text| text.trim().chars().count() > MIN_PARAGRAPH_CHARS)
                .map(sanitize),
        ]
        .into_iter()
        .flatten()
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());

        Extracted {
            title,
            description: truncate(description, self.desc_max_len),
        }
    }
}

/// Makes text safe for the JSON output: `"` becomes `'`, control characters
/// (CR, LF, TAB, ...) become spaces, whitespace runs collapse to one space.
pub fn sanitize(text: &str) -> String {
    let replaced: String = text
        .chars()
        .map(|c| match c {
            '"' => '\'',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect();

    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True when `sanitize` would leave the text unchanged in the ways that
/// matter for output: no double quotes and no control characters
pub fn is_sanitized(text: &str) -> bool {
    !text.chars().any(|c| c == '"' || c.is_control())
}

// Cuts to `max_len` characters, ending in "..." when there is room for it
fn truncate(text: String, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text;
    }

    let ellipsis_len = ELLIPSIS.chars().count();
    if max_len <= ellipsis_len {
        return text.chars().take(max_len).collect();
    }

    let mut cut: String = text.chars().take(max_len - ellipsis_len).collect();
    cut.push_str(ELLIPSIS);
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> ContentExtractor {
        ContentExtractor::new(200)
    }

    #[test]
    fn test_meta_description_wins() {
        let doc = ParsedDocument::builder("https://example.com")
            .with_title("Example")
            .with_meta_name("description", "  From meta  ")
            .with_meta_property("og:description", "From og")
            .with_paragraph("A paragraph that is long enough to count.");
        let extracted = extractor().extract(&doc);
        assert_eq!(extracted.title, "Example");
        assert_eq!(extracted.description, "From meta");
    }

    #[test]
    fn test_falls_back_to_og_description() {
        let doc = ParsedDocument::builder("https://example.com").with_meta_property("og:description", "X");
        assert_eq!(extractor().extract(&doc).description, "X");
    }

    #[test]
    fn test_blank_meta_description_falls_through() {
        let doc = ParsedDocument::builder("https://example.com")
            .with_meta_name("description", "   ")
            .with_meta_property("og:description", "Open graph text");
        assert_eq!(extractor().extract(&doc).description, "Open graph text");
    }

    #[test]
    fn test_skips_short_paragraphs() {
        let doc = ParsedDocument::builder("https://example.com")
            .with_paragraph("Hi")
            .with_paragraph("This site discusses plasma physics research.");
        assert_eq!(
            extractor().extract(&doc).description,
            "This site discusses plasma physics research."
        );
    }

    #[test]
    fn test_paragraph_of_exactly_threshold_length_is_skipped() {
        let twenty = "a".repeat(MIN_PARAGRAPH_CHARS);
        let doc = ParsedDocument::builder("https://example.com").with_paragraph(&twenty);
        assert_eq!(extractor().extract(&doc).description, NO_DESCRIPTION);
    }

    #[test]
    fn test_placeholders_when_nothing_found() {
        let doc = ParsedDocument::builder("https://example.com/empty").with_title("  \n ");
        let extracted = extractor().extract(&doc);
        assert_eq!(extracted.title, "Neural Node: https://example.com/empty");
        assert_eq!(extracted.description, NO_DESCRIPTION);
    }

    #[test]
    fn test_long_description_is_truncated() {
        let long = "x".repeat(300);
        let doc = ParsedDocument::builder("https://example.com").with_meta_name("description", &long);
        let description = extractor().extract(&doc).description;
        assert_eq!(description.chars().count(), 200);
        assert!(description.ends_with("..."));
        assert!(description.starts_with(&"x".repeat(197)));
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let long = "é".repeat(250);
        let doc = ParsedDocument::builder("https://example.com").with_meta_name("description", &long);
        let description = extractor().extract(&doc).description;
        assert_eq!(description.chars().count(), 200);
    }

    #[test]
    fn test_tiny_limit_has_no_room_for_ellipsis() {
        let doc = ParsedDocument::builder("https://example.com").with_meta_name("description", "abcdef");
        assert_eq!(ContentExtractor::new(2).extract(&doc).description, "ab");
    }

    #[test]
    fn test_sanitizes_every_source_the_same_way() {
        let dirty = "Say \"hi\"\r\nto\tthe crew, everyone on board";
        let expected = "Say 'hi' to the crew, everyone on board";

        let from_meta = ParsedDocument::builder("https://example.com").with_meta_name("description", dirty);
        let from_og = ParsedDocument::builder("https://example.com").with_meta_property("og:description", dirty);
        let from_p = ParsedDocument::builder("https://example.com").with_paragraph(dirty);

        for doc in [from_meta, from_og, from_p] {
            let description = extractor().extract(&doc).description;
            assert_eq!(description, expected);
            assert!(is_sanitized(&description));
        }
    }

    #[test]
    fn test_title_is_sanitized() {
        let doc = ParsedDocument::builder("https://example.com").with_title("The \"Best\"\nPage");
        assert_eq!(extractor().extract(&doc).title, "The 'Best' Page");
    }
}
