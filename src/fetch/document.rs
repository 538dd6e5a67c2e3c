// src/fetch/document.rs
// =============================================================================
// A parsed web page, reduced to what the crawler asks of it.
//
// `scraper::Html` is not Send, so it cannot be held across an .await inside
// the worker pool. Instead we parse once, pull out the pieces we need, and
// drop the DOM. The resulting ParsedDocument is plain owned data:
// - the declared <title>
// - meta tag content, by name and by property
// - the text of every <p>
// - every <a href> resolved to an absolute URL
// =============================================================================

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use url::Url;

// These selectors are constants and known to be valid
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("valid selector"));
static META: Lazy<Selector> = Lazy::new(|| Selector::parse("meta[content]").expect("valid selector"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("valid selector"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("valid selector"));
static BASE: Lazy<Selector> = Lazy::new(|| Selector::parse("base[href]").expect("valid selector"));

#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    /// The URL this document was requested as
    pub url: String,
    /// Declared title, whitespace-normalised (may be empty)
    pub title: String,
    meta_by_name: HashMap<String, String>,
    meta_by_property: HashMap<String, String>,
    paragraphs: Vec<String>,
    links: Vec<String>,
}

impl ParsedDocument {
    /// Parses `html` that was requested as `url` and served from `base`
    /// (the final URL after redirects).
    pub fn parse(url: &str, html: &str, base: &Url) -> Self {
        let document = Html::parse_document(html);

        let title = document
            .select(&TITLE)
            .next()
            .map(|el| element_text(&el))
            .unwrap_or_default();

        let mut meta_by_name = HashMap::new();
        let mut meta_by_property = HashMap::new();
        for meta in document.select(&META) {
            let attrs = meta.value();
            let Some(content) = attrs.attr("content") else { continue };
            // First tag wins, like a CSS query for the first match
            if let Some(name) = attrs.attr("name") {
                meta_by_name
                    .entry(name.trim().to_ascii_lowercase())
                    .or_insert_with(|| content.to_string());
            }
            if let Some(property) = attrs.attr("property") {
                meta_by_property
                    .entry(property.trim().to_ascii_lowercase())
                    .or_insert_with(|| content.to_string());
            }
        }

        let paragraphs = document
            .select(&PARAGRAPH)
            .map(|el| element_text(&el))
            .collect();

        // <base href> changes how relative links resolve
        let base = document
            .select(&BASE)
            .next()
            .and_then(|el| el.value().attr("href"))
            .and_then(|href| base.join(href.trim()).ok())
            .unwrap_or_else(|| base.clone());

        let links = document
            .select(&ANCHOR)
            .filter_map(|el| el.value().attr("href"))
            .filter_map(|href| resolve_url(&base, href))
            .collect();

        Self {
            url: url.to_string(),
            title,
            meta_by_name,
            meta_by_property,
            paragraphs,
            links,
        }
    }

    /// Content of `<meta name="...">`, matched case-insensitively
    pub fn meta_name(&self, name: &str) -> Option<&str> {
        self.meta_by_name.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Content of `<meta property="...">`, matched case-insensitively
    pub fn meta_property(&self, property: &str) -> Option<&str> {
        self.meta_by_property
            .get(&property.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Text of the first paragraph accepted by `pred`
    pub fn first_paragraph<P>(&self, mut pred: P) -> Option<&str>
    where
        P: FnMut(&str) -> bool,
    {
        self.paragraphs.iter().map(String::as_str).find(|text| pred(text))
    }

    /// Absolute URLs of every anchor, in document order
    pub fn links(&self) -> &[String] {
        &self.links
    }
}

#[cfg(test)]
impl ParsedDocument {
    // Hand-built documents for crawler tests
    pub fn builder(url: &str) -> Self {
        Self { url: url.to_string(), ..Self::default() }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_meta_name(mut self, name: &str, content: &str) -> Self {
        self.meta_by_name.insert(name.to_string(), content.to_string());
        self
    }

    pub fn with_meta_property(mut self, property: &str, content: &str) -> Self {
        self.meta_by_property.insert(property.to_string(), content.to_string());
        self
    }

    pub fn with_paragraph(mut self, text: &str) -> Self {
        self.paragraphs.push(text.to_string());
        self
    }

    pub fn with_link(mut self, link: &str) -> Self {
        self.links.push(link.to_string());
        self
    }
}

// Collects an element's text and collapses runs of whitespace
fn element_text(element: &ElementRef) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

// Resolves a possibly-relative href against the page's base URL
//
// Examples:
//   base = "https://example.com/page"
//   href = "/docs"              -> Some("https://example.com/docs")
//   href = "https://other.com"  -> Some("https://other.com/")
//   href = ""                   -> None
fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    match Url::parse(href) {
        Ok(url) => Some(url.to_string()),
        Err(_) => base.join(href).ok().map(|url| url.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> ParsedDocument {
        let base = Url::parse("https://example.com/section/page").unwrap();
        ParsedDocument::parse(base.as_str(), html, &base)
    }

    #[test]
    fn test_title_is_whitespace_normalised() {
        let doc = parse("<html><head><title>\n  Mission   Control \n</title></head></html>");
        assert_eq!(doc.title, "Mission Control");
    }

    #[test]
    fn test_missing_title_is_empty() {
        let doc = parse("<html><body><p>No title here</p></body></html>");
        assert_eq!(doc.title, "");
    }

    #[test]
    fn test_meta_lookup_by_name_and_property() {
        let doc = parse(
            r#"<head>
                <meta name="Description" content="By name">
                <meta property="og:description" content="By property">
                <meta name="description" content="Second one is ignored">
            </head>"#,
        );
        assert_eq!(doc.meta_name("description"), Some("By name"));
        assert_eq!(doc.meta_property("OG:Description"), Some("By property"));
        assert_eq!(doc.meta_name("keywords"), None);
    }

    #[test]
    fn test_first_paragraph_with_predicate() {
        let doc = parse("<p>Hi</p><p>A <b>much</b>\n longer paragraph</p>");
        assert_eq!(doc.first_paragraph(|_| true), Some("Hi"));
        assert_eq!(
            doc.first_paragraph(|t| t.len() > 5),
            Some("A much longer paragraph")
        );
        assert_eq!(doc.first_paragraph(|t| t.len() > 100), None);
    }

    #[test]
    fn test_links_are_absolute() {
        let doc = parse(
            r##"
            <a href="https://rust-lang.org">Rust</a>
            <a href="/docs">Docs</a>
            <a href="../about">About</a>
            <a href="#top">Top</a>
            <a href="mailto:team@example.com">Mail</a>
            <a href="">Empty</a>
        "##,
        );
        assert_eq!(
            doc.links(),
            &[
                "https://rust-lang.org/".to_string(),
                "https://example.com/docs".to_string(),
                "https://example.com/about".to_string(),
                "https://example.com/section/page#top".to_string(),
                "mailto:team@example.com".to_string(),
            ]
        );
    }

    #[test]
    fn test_base_href_changes_resolution() {
        let doc = parse(r#"<head><base href="https://cdn.example.org/root/"></head><a href="child">x</a>"#);
        assert_eq!(doc.links(), &["https://cdn.example.org/root/child".to_string()]);
    }
}
