use crate::config::types::{Config, CrawlConfig, CredentialsConfig, DownloadConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

const MIN_CHUNK_SIZE: usize = 512;
const MAX_CHUNK_SIZE: usize = 1024 * 1024;
const MAX_PAGE_DELAY_MS: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawl_config(&config.crawl)?;
    validate_download_config(&config.download)?;
    validate_credentials_config(&config.credentials)?;
    Ok(())
}

/// Validates the target site settings
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", config.base_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' has no host",
            config.base_url
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.page_delay_ms > MAX_PAGE_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "page-delay-ms must be <= {}ms, got {}ms",
            MAX_PAGE_DELAY_MS, config.page_delay_ms
        )));
    }

    if let Some(query) = &config.query {
        if query.trim().is_empty() {
            return Err(ConfigError::Validation(
                "query cannot be blank when set".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_download_config(config: &DownloadConfig) -> Result<(), ConfigError> {
    if config.destination_root.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "destination-root cannot be empty".to_string(),
        ));
    }

    if !(MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&config.chunk_size) {
        return Err(ConfigError::Validation(format!(
            "chunk-size must be between {} and {}, got {}",
            MIN_CHUNK_SIZE, MAX_CHUNK_SIZE, config.chunk_size
        )));
    }

    if config.fallback_extension.is_empty()
        || !config
            .fallback_extension
            .chars()
            .all(|c| c.is_ascii_alphanumeric())
    {
        return Err(ConfigError::Validation(format!(
            "fallback-extension must be non-empty and alphanumeric, got '{}'",
            config.fallback_extension
        )));
    }

    Ok(())
}

fn validate_credentials_config(config: &CredentialsConfig) -> Result<(), ConfigError> {
    if config.path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "credentials path cannot be empty".to_string(),
        ));
    }
    Ok(())
}
