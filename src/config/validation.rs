use crate::config::types::{Config, CrawlerConfig, FetcherConfig, LinksConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on configurable redirect hops
const MAX_REDIRECT_LIMIT: usize = 50;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_seeds(&config.seeds)?;
    validate_crawler_config(&config.crawler)?;
    validate_links_config(&config.links)?;
    validate_fetcher_config(&config.fetcher)?;
    Ok(())
}

/// Validates seed URLs
///
/// An empty list is allowed here so seeds can come from the command line;
/// the binary rejects a crawl with no seeds at all.
fn validate_seeds(seeds: &[String]) -> Result<(), ConfigError> {
    for seed in seeds {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "Seed URL '{}' must use http or https",
                seed
            )));
        }

        if url.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(format!(
                "Seed URL '{}' has no host",
                seed
            )));
        }
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // depth >= 0 is always true for u32, so no check needed

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if !config.delay_seconds.is_finite() || config.delay_seconds < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay-seconds must be a non-negative number, got {}",
            config.delay_seconds
        )));
    }

    Ok(())
}

/// Validates link prioritization configuration
fn validate_links_config(config: &LinksConfig) -> Result<(), ConfigError> {
    if config
        .priority_keywords
        .iter()
        .any(|keyword| keyword.trim().is_empty())
    {
        return Err(ConfigError::Validation(
            "priority-keywords cannot contain empty strings".to_string(),
        ));
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_seconds < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-seconds must be >= 1, got {}",
            config.timeout_seconds
        )));
    }

    if config.max_redirects > MAX_REDIRECT_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max-redirects must be <= {}, got {}",
            MAX_REDIRECT_LIMIT, config.max_redirects
        )));
    }

    Ok(())
}
