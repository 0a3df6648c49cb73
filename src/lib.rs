//! Soundtrawl: an authenticated sound-library harvester
//!
//! This crate logs into a sound-sharing site, walks paginated search results,
//! extracts result metadata and downloads each sound to local storage, skipping
//! files that are already present.

pub mod config;
pub mod crawler;
pub mod download;
pub mod interact;
pub mod output;
pub mod session;
pub mod state;

use thiserror::Error;

/// Main error type for Soundtrawl operations
#[derive(Debug, Error)]
pub enum TrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Search page fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("Credential store error: {0}")]
    Credentials(#[from] CredentialError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while establishing an authenticated session
///
/// All of these are fatal to the run: no search is attempted without a session.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("anti-forgery token not found on {url}")]
    TokenNotFound { url: String },

    #[error("login rejected for user '{username}', check your username and password")]
    Rejected { username: String },

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("network error contacting {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("invalid site URL: {0}")]
    Url(#[from] ::url::ParseError),
}

/// Errors raised while fetching a search result page
///
/// These end pagination for the current query.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("network error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },
}

/// Errors raised while downloading a single asset
///
/// These are recoverable at record granularity.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("network error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("invalid download URL: {0}")]
    Url(#[from] ::url::ParseError),

    #[error("IO error writing {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Errors from the credential store collaborator
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to access credentials file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed credentials file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type alias for Soundtrawl operations
pub type Result<T> = std::result::Result<T, TrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{build_search_url, extract_records, run, Coordinator};
pub use download::{download_asset, sanitize_filename, DownloadOutcome};
pub use interact::{Credentials, CredentialStore, Prompter};
pub use session::Session;
pub use state::{CrawlOutcome, CrawlState, SearchRecord};
