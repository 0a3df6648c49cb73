//! Filesystem-safe filename sanitization.

/// Characters that may not appear in a filename on common filesystems
pub const RESERVED_CHARS: [char; 9] = ['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Sanitizes a candidate filename for use on disk.
///
/// - Replaces each of `\ / * ? : " < > |` with `_`, one for one
/// - Trims leading whitespace
/// - Trims trailing whitespace and dots
///
/// Applying it twice gives the same result as applying it once.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if RESERVED_CHARS.contains(&c) { '_' } else { c })
        .collect();

    replaced
        .trim_start()
        .trim_end_matches(|c: char| c == '.' || c.is_whitespace())
        .to_string()
}
