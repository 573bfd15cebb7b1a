//! URL handling module for Site-Crawler
//!
//! This module provides URL normalization and the same-site host key used by
//! the link filter.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{is_same_site, site_host};
pub use normalize::normalize_url;
