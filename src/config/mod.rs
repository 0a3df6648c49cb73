//! Configuration module for Soundtrawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so running without a file is supported.
//!
//! # Example
//!
//! ```no_run
//! use soundtrawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("soundtrawl.toml")).unwrap();
//! println!("Downloads go to: {}", config.download.destination_root.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlConfig, CredentialsConfig, DownloadConfig, SiteConfig, DEFAULT_BASE_URL,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
