use url::Url;

/// Extracts the same-site key of a URL
///
/// The key is the lowercase host with every leading `www.` label removed.
/// Two URLs are on the same site exactly when their keys are equal; ports and
/// deeper subdomains are not considered.
///
/// # Arguments
///
/// * `url` - The URL to extract the site key from
///
/// # Returns
///
/// * `Some(String)` - The site key
/// * `None` - If the URL has no host (e.g. `mailto:` links)
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_crawler::url::site_host;
///
/// let url = Url::parse("https://WWW.Example.com/path").unwrap();
/// assert_eq!(site_host(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("https://blog.example.com/path").unwrap();
/// assert_eq!(site_host(&url), Some("blog.example.com".to_string()));
/// ```
pub fn site_host(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(strip_www(&host).to_string())
}

/// Removes leading `www.` labels, never leaving the host empty
pub(crate) fn strip_www(host: &str) -> &str {
    let mut host = host;
    while let Some(stripped) = host.strip_prefix("www.") {
        if stripped.is_empty() {
            break;
        }
        host = stripped;
    }
    host
}

/// Returns true if both URLs belong to the same site
pub fn is_same_site(candidate: &Url, base: &Url) -> bool {
    match (site_host(candidate), site_host(base)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_simple_host() {
        assert_eq!(
            site_host(&parse("https://example.com/")),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_www_removed() {
        assert_eq!(
            site_host(&parse("https://www.example.com/")),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_repeated_www_removed() {
        assert_eq!(
            site_host(&parse("https://www.www.example.com/")),
            Some("example.com".to_string())
        );
        assert!(is_same_site(
            &parse("https://www.www.example.com/a"),
            &parse("https://example.com/")
        ));
    }

    #[test]
    fn test_strip_www_keeps_bare_label() {
        assert_eq!(strip_www("www."), "www.");
        assert_eq!(strip_www("www.www."), "www.");
    }

    #[test]
    fn test_subdomain_kept() {
        assert_eq!(
            site_host(&parse("https://blog.example.com/post")),
            Some("blog.example.com".to_string())
        );
    }

    #[test]
    fn test_port_ignored() {
        assert_eq!(
            site_host(&parse("http://127.0.0.1:8080/")),
            Some("127.0.0.1".to_string())
        );
    }

    #[test]
    fn test_no_host() {
        assert_eq!(site_host(&parse("mailto:admin@example.com")), None);
    }

    #[test]
    fn test_same_site_ignores_www_and_scheme() {
        assert!(is_same_site(
            &parse("http://www.example.com/a"),
            &parse("https://example.com/b")
        ));
    }

    #[test]
    fn test_subdomain_is_other_site() {
        assert!(!is_same_site(
            &parse("https://blog.example.com/a"),
            &parse("https://example.com/")
        ));
        assert!(!is_same_site(
            &parse("https://example.org/"),
            &parse("https://example.com/")
        ));
    }
}
