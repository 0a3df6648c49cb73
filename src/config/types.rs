use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Site that is logged into and searched when no config overrides it
pub const DEFAULT_BASE_URL: &str = "https://freesound.org";

/// Browser-like client identifier; the site rejects requests without one
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Main configuration structure for Soundtrawl
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub crawl: CrawlConfig,
    pub download: DownloadConfig,
    pub credentials: CredentialsConfig,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Root URL of the site; login, search and download paths hang off it
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Pagination behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Fixed pause after each processed page (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,

    /// First search query; the operator is prompted when absent
    pub query: Option<String>,
}

impl CrawlConfig {
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            page_delay_ms: 1000,
            query: None,
        }
    }
}

/// Asset download configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Root directory; each query gets its own subdirectory
    #[serde(rename = "destination-root")]
    pub destination_root: PathBuf,

    /// Write buffer size used while streaming a body to disk
    #[serde(rename = "chunk-size")]
    pub chunk_size: usize,

    /// Extension appended to the result name when the server sends no filename
    #[serde(rename = "fallback-extension")]
    pub fallback_extension: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            destination_root: PathBuf::from("downloads"),
            chunk_size: 8192,
            fallback_extension: "wav".to_string(),
        }
    }
}

/// Credential file location
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Path to the JSON credentials file
    pub path: PathBuf,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("freesound_credentials.json"),
        }
    }
}
