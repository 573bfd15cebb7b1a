//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the browser-like identity header
//! - GET requests with a per-request timeout
//! - Redirect following with a hop limit
//! - Error classification into machine-readable kinds
//! - Pacing consecutive requests through the [`Throttle`]

use crate::crawler::settings::FetchSettings;
use crate::crawler::throttle::Throttle;
use reqwest::{redirect::Policy, Client};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Machine-readable classification of a failed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// The request exceeded the per-request timeout
    Timeout,

    /// Connection refused, DNS failure or TLS handshake error
    Connect,

    /// The server answered with a non-2xx status
    HttpStatus,

    /// The redirect limit was exceeded
    Redirect,

    /// The response body could not be read
    Body,

    /// Any other request failure (bad URL, protocol error)
    Request,
}

impl FetchErrorKind {
    /// Short tag used in status strings and serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::HttpStatus => "http_status",
            Self::Redirect => "redirect",
            Self::Body => "body",
            Self::Request => "request",
        }
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A per-URL fetch failure
///
/// These are recorded on the page's record and never abort a session.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FetchErrorKind,

    pub message: String,

    /// HTTP status code, when the server answered at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
        }
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// Classifies a reqwest error
    fn from_reqwest(error: &reqwest::Error) -> Self {
        let status_code = error.status().map(|s| s.as_u16());
        let (kind, message) = if error.is_timeout() {
            (FetchErrorKind::Timeout, "Request timeout".to_string())
        } else if error.is_connect() {
            (FetchErrorKind::Connect, format!("Connection failed: {}", error))
        } else if error.is_redirect() {
            (FetchErrorKind::Redirect, "Too many redirects".to_string())
        } else if error.is_body() || error.is_decode() {
            (FetchErrorKind::Body, format!("Failed to read body: {}", error))
        } else {
            (FetchErrorKind::Request, error.to_string())
        };

        Self {
            kind,
            message,
            status_code,
        }
    }
}

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,

    /// HTTP status code
    pub status_code: u16,

    /// Content-Type header value, empty when absent
    pub content_type: String,

    /// Raw response body
    pub body: Vec<u8>,
}

impl FetchedPage {
    /// Whether the body should be treated as HTML
    ///
    /// A missing Content-Type is given the benefit of the doubt.
    pub fn is_html(&self) -> bool {
        let content_type = self.content_type.to_ascii_lowercase();
        content_type.is_empty() || content_type.contains("html")
    }
}

/// Builds an HTTP client with the configured identity and limits
///
/// # Arguments
///
/// * `settings` - The fetch settings
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use site_crawler::crawler::{build_http_client, FetchSettings};
///
/// let client = build_http_client(&FetchSettings::default()).unwrap();
/// ```
pub fn build_http_client(settings: &FetchSettings) -> Result<Client, reqwest::Error> {
    if settings.accept_invalid_certs {
        tracing::debug!("TLS certificate validation is disabled");
    }

    Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(settings.timeout)
        .connect_timeout(settings.timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(settings.max_redirects))
        .danger_accept_invalid_certs(settings.accept_invalid_certs)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues a single GET request and classifies the outcome
///
/// # Outcome Mapping
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | `Ok(FetchedPage)` |
/// | Other status | `HttpStatus` |
/// | Timeout | `Timeout` |
/// | Connection refused / DNS / TLS | `Connect` |
/// | Redirect chain over the limit | `Redirect` |
/// | Body read failure | `Body` |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_url(client: &Client, url: &str) -> Result<FetchedPage, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::from_reqwest(&e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::new(
            FetchErrorKind::HttpStatus,
            format!("HTTP {}", status),
        )
        .with_status(status.as_u16()));
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body = response
        .bytes()
        .await
        .map_err(|e| FetchError::from_reqwest(&e).with_status(status.as_u16()))?;

    Ok(FetchedPage {
        final_url,
        status_code: status.as_u16(),
        content_type,
        body: body.to_vec(),
    })
}

/// HTTP fetcher that paces its own requests
///
/// Every call to [`Fetcher::fetch`] first waits until the throttle allows the
/// next request, so at most one request is in flight and consecutive requests
/// are at least the configured delay apart.
pub struct Fetcher {
    client: Client,
    throttle: Throttle,
}

impl Fetcher {
    /// Creates a fetcher from settings and the politeness delay
    pub fn new(settings: &FetchSettings, delay: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(settings)?,
            throttle: Throttle::new(delay),
        })
    }

    /// Waits for the throttle, then fetches the URL
    pub async fn fetch(&mut self, url: &str) -> Result<FetchedPage, FetchError> {
        self.throttle.wait_turn().await;
        let result = fetch_url(&self.client, url).await;
        self.throttle.record_fetch();
        result
    }

    /// Returns the politeness delay
    pub fn delay(&self) -> Duration {
        self.throttle.delay()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&FetchSettings::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_strict_tls_client() {
        let settings = FetchSettings {
            accept_invalid_certs: false,
            ..FetchSettings::default()
        };
        assert!(build_http_client(&settings).is_ok());
    }

    #[test]
    fn test_error_display_carries_kind() {
        let error = FetchError::new(FetchErrorKind::Timeout, "Request timeout");
        assert_eq!(error.to_string(), "timeout: Request timeout");
        assert_eq!(error.status_code, None);
    }

    fn page_with_type(content_type: &str) -> FetchedPage {
        FetchedPage {
            final_url: "https://example.com/".to_string(),
            status_code: 200,
            content_type: content_type.to_string(),
            body: Vec::new(),
        }
    }

    #[test]
    fn test_is_html() {
        assert!(page_with_type("text/html; charset=utf-8").is_html());
        assert!(page_with_type("application/xhtml+xml").is_html());
        assert!(page_with_type("Text/HTML").is_html());
        assert!(page_with_type("").is_html());
        assert!(!page_with_type("application/pdf").is_html());
        assert!(!page_with_type("text/plain").is_html());
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(FetchErrorKind::HttpStatus.as_str(), "http_status");
        assert_eq!(FetchErrorKind::Connect.to_string(), "connect");
    }

    #[tokio::test]
    async fn test_connection_refused_is_classified() {
        let client = build_http_client(&FetchSettings::default()).unwrap();
        // Port 9 (discard) on localhost is closed on test machines.
        let result = fetch_url(&client, "http://127.0.0.1:9/").await;
        let error = result.unwrap_err();
        assert!(matches!(
            error.kind,
            FetchErrorKind::Connect | FetchErrorKind::Request
        ));
    }

    #[tokio::test]
    async fn test_unsupported_scheme_is_request_error() {
        let client = build_http_client(&FetchSettings::default()).unwrap();
        let error = fetch_url(&client, "ftp://example.com/file").await.unwrap_err();
        assert_eq!(error.kind, FetchErrorKind::Request);
    }
}
