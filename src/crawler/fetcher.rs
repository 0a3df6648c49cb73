//! Search page URLs and fetching
//!
//! This module handles:
//! - Building the search URL for a (query, page) pair
//! - Fetching a search page through the authenticated session
//! - Classifying failures as HTTP status or network errors

use crate::session::Session;
use crate::FetchError;
use url::Url;

/// Path of the search endpoint, relative to the site root
pub const SEARCH_PATH: &str = "/search/";

/// Builds the URL of one page of search results
///
/// Parameters are form-urlencoded, so `"foo bar"` becomes `q=foo+bar`.
///
/// # Example
///
/// ```
/// use soundtrawl::crawler::build_search_url;
/// use url::Url;
///
/// let base = Url::parse("https://sounds.example.com").unwrap();
/// let url = build_search_url(&base, "rain", 2).unwrap();
/// assert_eq!(url.as_str(), "https://sounds.example.com/search/?q=rain&page=2");
/// ```
pub fn build_search_url(base_url: &Url, query: &str, page: u32) -> Result<Url, url::ParseError> {
    let mut url = base_url.join(SEARCH_PATH)?;
    url.query_pairs_mut()
        .clear()
        .append_pair("q", query)
        .append_pair("page", &page.to_string());
    Ok(url)
}

/// Fetches a document through the session and returns its body
///
/// Nothing is retried: a failure ends pagination for the current query.
///
/// # Returns
///
/// * `Ok(String)` - The response body of a 2xx response
/// * `Err(FetchError::HttpStatus)` - The server answered with a non-2xx status
/// * `Err(FetchError::Network)` - The request or body read failed
pub async fn fetch_document(session: &Session, url: &Url) -> Result<String, FetchError> {
    let response = session
        .client()
        .get(url.clone())
        .send()
        .await
        .map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| FetchError::Network {
        url: url.to_string(),
        source,
    })
}
