//! HTML parser for extracting page text and links
//!
//! This module handles parsing HTML content to extract:
//! - The page title
//! - Cleaned visible text (script and style removed, whitespace collapsed)
//! - Candidate links to follow, structural regions first

use crate::url::normalize_url;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Maximum number of characters kept from a page's text
pub const MAX_CONTENT_CHARS: usize = 10_000;

/// Placeholder title for pages without a `<title>`
pub const NO_TITLE: &str = "No title";

/// Links under these regions are discovered before the rest of the page
const STRUCTURAL_LINK_SELECTOR: &str = "nav a[href], header a[href], main a[href], \
     article a[href], section a[href], \
     [class*='nav'] a[href], [id*='nav'] a[href], \
     [class*='menu'] a[href], [id*='menu'] a[href], \
     [class*='content'] a[href], [id*='content'] a[href]";

/// Every hyperlink-bearing element
const GENERIC_LINK_SELECTOR: &str = "a[href], area[href], link[href]";

/// Title and text extracted from a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    /// The page title, or "No title"
    pub title: String,

    /// Cleaned text content, at most [`MAX_CONTENT_CHARS`] characters
    pub content: String,
}

/// Parses raw page bytes into a title and cleaned text
///
/// # Text Extraction Rules
///
/// - Text inside `<script>` and `<style>` is dropped
/// - Remaining text nodes are concatenated in document order
/// - The text is split on line breaks and double spaces, each fragment is
///   trimmed, and the non-empty fragments are joined with single spaces
/// - The result is truncated to [`MAX_CONTENT_CHARS`] characters
///
/// Invalid UTF-8 is replaced rather than rejected, and the HTML5 parser
/// recovers from any malformed markup, so this never fails.
///
/// # Example
///
/// ```
/// use site_crawler::crawler::parse_page;
///
/// let html = b"<html><head><title>Test</title><style>p{}</style></head><body><p>Hello   world</p></body></html>";
/// let parsed = parse_page(html);
/// assert_eq!(parsed.title, "Test");
/// assert_eq!(parsed.content, "TestHello world");
/// ```
pub fn parse_page(body: &[u8]) -> ParsedPage {
    let html = String::from_utf8_lossy(body);
    let document = Html::parse_document(&html);
    parse_document(&document)
}

/// Extracts title and text from an already parsed document
pub(crate) fn parse_document(document: &Html) -> ParsedPage {
    ParsedPage {
        title: extract_title(document),
        content: extract_content(document),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> String {
    let title_selector = match Selector::parse("title") {
        Ok(selector) => selector,
        Err(_) => return NO_TITLE.to_string(),
    };

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

/// Collects visible text, skipping script and style contents
fn extract_content(document: &Html) -> String {
    let mut raw = String::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|el| matches!(el.name(), "script" | "style"))
                .unwrap_or(false)
        });

        if !hidden {
            raw.push_str(text);
        }
    }

    clean_text(&raw)
}

/// Collapses whitespace and truncates to [`MAX_CONTENT_CHARS`]
pub fn clean_text(raw: &str) -> String {
    let joined = raw
        .lines()
        .flat_map(|line| line.trim().split("  "))
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    truncate_chars(&joined, MAX_CONTENT_CHARS)
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Extracts candidate links from raw page bytes
///
/// Links inside navigation, menu, content, article and section regions are
/// returned first, followed by every other `<a>`, `<area>` and `<link>` href.
/// Each href is resolved against the page URL (or the document's
/// `<base href>`), normalized, and deduplicated in discovery order.
///
/// # Example
///
/// ```
/// use site_crawler::crawler::extract_links;
/// use url::Url;
///
/// let html = br#"<body><a href="/b">B</a><nav><a href="/a/">A</a></nav></body>"#;
/// let base = Url::parse("https://example.com/").unwrap();
/// assert_eq!(
///     extract_links(html, &base),
///     vec!["https://example.com/a", "https://example.com/b"]
/// );
/// ```
pub fn extract_links(body: &[u8], base_url: &Url) -> Vec<String> {
    let html = String::from_utf8_lossy(body);
    let document = Html::parse_document(&html);
    extract_document_links(&document, base_url)
}

/// Extracts candidate links from an already parsed document
pub(crate) fn extract_document_links(document: &Html, base_url: &Url) -> Vec<String> {
    let base = document_base(document, base_url);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for selector in [STRUCTURAL_LINK_SELECTOR, GENERIC_LINK_SELECTOR] {
        let Ok(selector) = Selector::parse(selector) else {
            continue;
        };

        for element in document.select(&selector) {
            if let Some(link) = resolve_element_href(element, &base) {
                if seen.insert(link.clone()) {
                    links.push(link);
                }
            }
        }
    }

    links
}

/// Honors `<base href>` when present and resolvable
fn document_base(document: &Html, page_url: &Url) -> Url {
    Selector::parse("base[href]")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| page_url.join(href.trim()).ok())
        .unwrap_or_else(|| page_url.clone())
}

fn resolve_element_href(element: ElementRef<'_>, base: &Url) -> Option<String> {
    let href = element.value().attr("href")?;
    resolve_link(href, base)
}

/// Resolves a link href to a normalized absolute URL
///
/// Returns None for empty hrefs and hrefs that cannot be resolved. Scheme
/// filtering is left to the link filter.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    base_url
        .join(href)
        .ok()
        .map(|absolute| normalize_url(absolute.as_str()))
}
