use url::Url;

/// Owner name used when a result carries no profile link
pub const UNKNOWN_USERNAME: &str = "Unknown";

/// One search result, as extracted from a result page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRecord {
    /// Site identifier of the sound (second-to-last path segment of its link)
    pub id: String,

    /// Display name of the sound
    pub name: String,

    /// Absolute URL of the sound's page, always ending in `/`
    pub url: Url,

    /// Uploader's username, or [`UNKNOWN_USERNAME`]
    pub username: String,
}

impl SearchRecord {
    /// URL that serves the asset itself
    pub fn download_url(&self) -> Result<Url, url::ParseError> {
        self.url.join("download/")
    }
}
