//! Reading `soundtrawl.toml`

use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads the TOML file at `path` into a validated [`Config`]
///
/// Left-out sections and keys take their defaults, so an empty file
/// describes a crawl of the public site with the stock download layout.
///
/// # Errors
///
/// * `ConfigError::Io` - the file could not be read
/// * `ConfigError::Parse` - the text is not a valid `[site]`/`[crawl]`/`[download]`/`[credentials]` document
/// * `ConfigError::Validation` - a value is out of range
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    parse_config(&text)
}

/// Parses and validates configuration text already in memory
pub fn parse_config(text: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(text)?;
    validate(&config)?;
    Ok(config)
}

/// Hex SHA-256 digest of a configuration file
///
/// `main` logs it beside the crawl so a download folder can be traced back
/// to the settings that filled it.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    Ok(digest(&text))
}

/// Loads a configuration with the digest of the exact text that was parsed
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let text = std::fs::read_to_string(path)?;
    let config = parse_config(&text)?;
    Ok((config, digest(&text)))
}

fn digest(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}
