//! Content-Disposition header parsing.

use once_cell::sync::Lazy;
use regex::Regex;

static QUOTED_FILENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bfilename\s*=\s*"([^"]*)""#).expect("Invalid quoted filename regex"));

static TOKEN_FILENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bfilename\s*=\s*([^";]+)"#).expect("Invalid token filename regex"));

/// Extracts the filename from a raw Content-Disposition header value.
///
/// Supports `filename="value"` (the quoted value, stopping at the closing
/// quote) and `filename=value` (up to the next `;`). Returns `None` when the
/// parameter is missing or empty.
pub fn filename_from_content_disposition(header_value: &str) -> Option<String> {
    let captured = QUOTED_FILENAME
        .captures(header_value)
        .or_else(|| TOKEN_FILENAME.captures(header_value))?;

    let filename = captured.get(1)?.as_str().trim();
    if filename.is_empty() {
        None
    } else {
        Some(filename.to_string())
    }
}
