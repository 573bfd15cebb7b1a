//! Link eligibility filtering and priority classification
//!
//! A discovered link is followed only if it stays on the page's site, looks
//! like an HTML content page, and has not been visited. Eligible links are then
//! split into navigational and content classes and capped per page.

use crate::url::is_same_site;
use serde::Serialize;
use std::collections::HashSet;
use url::Url;

/// File extensions that never lead to HTML content
const NON_CONTENT_EXTENSIONS: &[&str] = &[
    // Images
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".webp", ".ico", ".tif", ".tiff",
    // Audio and video
    ".mp3", ".mp4", ".wav", ".ogg", ".avi", ".mov", ".wmv", ".webm", ".flv", ".mkv",
    // Documents and archives
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".csv", ".zip", ".rar", ".gz",
    ".tar", ".7z", ".exe", ".dmg", ".iso",
    // Styles, scripts and fonts
    ".css", ".js", ".json", ".woff", ".woff2", ".ttf", ".eot", ".otf",
    // Feeds
    ".xml", ".rss", ".atom",
];

/// Path segments of pages with no crawlable content
const NON_CONTENT_SEGMENTS: &[&str] = &[
    "/login",
    "/register",
    "/cart",
    "/checkout",
    "/admin",
    "/wp-admin",
    "/feed",
    "/rss",
];

/// Query keys of search and filter result pages
const SEARCH_QUERY_KEYS: &[&str] = &["search", "q", "filter"];

/// Words that mark a link as navigational
pub const DEFAULT_PRIORITY_KEYWORDS: &[&str] = &["about", "service", "product", "contact"];

/// Decides whether a discovered link should be followed
///
/// A candidate is eligible when all of the following hold:
/// - scheme is `http` or `https`
/// - it is on the same site as `base_url` (host equality ignoring `www.`)
/// - its path does not end in a non-content file extension
/// - its path does not contain a non-content segment such as `/login`
/// - its query has no `search`, `q` or `filter` parameter
/// - it is not in `visited`
///
/// `candidate` is expected to be normalized already; `visited` holds
/// normalized URLs.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use site_crawler::crawler::is_eligible;
///
/// let visited = HashSet::new();
/// assert!(is_eligible("https://example.com/about", "https://www.example.com/", &visited));
/// assert!(!is_eligible("https://other.com/about", "https://example.com/", &visited));
/// assert!(!is_eligible("https://example.com/brochure.pdf", "https://example.com/", &visited));
/// ```
pub fn is_eligible(candidate: &str, base_url: &str, visited: &HashSet<String>) -> bool {
    let (Ok(url), Ok(base)) = (Url::parse(candidate), Url::parse(base_url)) else {
        return false;
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        tracing::trace!("Rejecting {}: unsupported scheme", candidate);
        return false;
    }

    if !is_same_site(&url, &base) {
        tracing::trace!("Rejecting {}: different site", candidate);
        return false;
    }

    let path = url.path().to_lowercase();

    if NON_CONTENT_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        tracing::trace!("Rejecting {}: non-content file", candidate);
        return false;
    }

    if NON_CONTENT_SEGMENTS.iter().any(|seg| path.contains(seg)) {
        tracing::trace!("Rejecting {}: non-content section", candidate);
        return false;
    }

    if has_search_query(&url) {
        tracing::trace!("Rejecting {}: search or filter query", candidate);
        return false;
    }

    !visited.contains(candidate)
}

fn has_search_query(url: &Url) -> bool {
    url.query_pairs().any(|(key, _)| {
        SEARCH_QUERY_KEYS
            .iter()
            .any(|search| search.eq_ignore_ascii_case(&key))
    })
}

/// Filters candidates down to eligible links, deduplicated in order
pub fn eligible_links(
    candidates: &[String],
    base_url: &str,
    visited: &HashSet<String>,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for candidate in candidates {
        if is_eligible(candidate, base_url, visited) && seen.insert(candidate.as_str()) {
            links.push(candidate.clone());
        }
    }

    links
}

/// Priority class of an eligible link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkPriority {
    /// Site structure pages (about, services, products, contact)
    Navigational,

    /// Everything else
    Content,
}

/// Assigns a priority class to a link
///
/// Implement this to replace the keyword heuristic without touching the
/// scheduler. Plain closures implement it too.
pub trait LinkScorer: Send + Sync {
    fn score(&self, url: &str) -> LinkPriority;
}

impl<F> LinkScorer for F
where
    F: Fn(&str) -> LinkPriority + Send + Sync,
{
    fn score(&self, url: &str) -> LinkPriority {
        self(url)
    }
}

/// Substring-matching scorer: any keyword in the URL makes it navigational
#[derive(Debug, Clone)]
pub struct KeywordScorer {
    keywords: Vec<String>,
}

impl KeywordScorer {
    /// Creates a scorer from keywords; matching is case-insensitive
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }
}

impl Default for KeywordScorer {
    fn default() -> Self {
        Self::new(DEFAULT_PRIORITY_KEYWORDS)
    }
}

impl LinkScorer for KeywordScorer {
    fn score(&self, url: &str) -> LinkPriority {
        let url = url.to_lowercase();
        if self.keywords.iter().any(|k| url.contains(k.as_str())) {
            LinkPriority::Navigational
        } else {
            LinkPriority::Content
        }
    }
}

/// Per-page admission caps for each priority class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanoutCaps {
    pub navigational: usize,
    pub content: usize,
}

impl Default for FanoutCaps {
    fn default() -> Self {
        Self {
            navigational: 3,
            content: 7,
        }
    }
}

/// Splits eligible links by priority and applies the per-page caps
///
/// Returns the admitted navigational links followed by the admitted content
/// links, each class in discovery order.
pub fn prioritize_links(
    eligible: &[String],
    scorer: &dyn LinkScorer,
    caps: FanoutCaps,
) -> Vec<String> {
    let (navigational, content): (Vec<&String>, Vec<&String>) = eligible
        .iter()
        .partition(|link| scorer.score(link) == LinkPriority::Navigational);

    navigational
        .into_iter()
        .take(caps.navigational)
        .chain(content.into_iter().take(caps.content))
        .cloned()
        .collect()
}
