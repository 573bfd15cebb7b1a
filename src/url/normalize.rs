use crate::url::domain::strip_www;
use url::Url;

/// Query parameters that only carry campaign tracking data
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "gclid",
    "fbclid",
];

/// Normalizes a URL into the canonical key used for deduplication
///
/// # Normalization Steps
///
/// 1. Parse the URL; anything unparsable or not HTTP(S) is returned unchanged
/// 2. Lowercase the scheme and host (done by the parser)
/// 3. Remove leading `www.` labels from the host
/// 4. Remove the fragment
/// 5. Remove the port when it is the scheme default (done by the parser)
/// 6. Remove tracking query parameters, keeping the others in their order
/// 7. Remove trailing slashes from the path, except for root `/`
///
/// The function is total and idempotent: normalizing an already normalized
/// URL returns it unchanged.
///
/// # Examples
///
/// ```
/// use site_crawler::url::normalize_url;
///
/// assert_eq!(
///     normalize_url("https://WWW.Example.com:443/Path/#top"),
///     "https://example.com/Path"
/// );
/// assert_eq!(normalize_url("not a url"), "not a url");
/// ```
pub fn normalize_url(url_str: &str) -> String {
    let mut url = match Url::parse(url_str) {
        Ok(url) => url,
        Err(_) => return url_str.to_string(),
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        return url_str.to_string();
    }

    if let Some(host) = url.host_str() {
        let stripped = strip_www(host);
        if stripped.len() != host.len() {
            let stripped = stripped.to_string();
            if url.set_host(Some(&stripped)).is_err() {
                return url_str.to_string();
            }
        }
    }

    url.set_fragment(None);

    if url.query().is_some() {
        let kept = retained_query_pairs(&url);
        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
    }

    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/');
        let trimmed = if trimmed.is_empty() {
            "/".to_string()
        } else {
            trimmed.to_string()
        };
        url.set_path(&trimmed);
    }

    url.to_string()
}

/// Returns the query pairs that survive tracking-parameter removal, in order
fn retained_query_pairs(url: &Url) -> Vec<(String, String)> {
    url.query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS
        .iter()
        .any(|param| param.eq_ignore_ascii_case(key))
}
