//! HTML extraction for search result pages
//!
//! All knowledge of the site's markup lives here: result containers, the
//! primary result link, uploader profile links, and the login form token.
//! A markup change on the site should only ever touch this module.

use crate::state::{SearchRecord, UNKNOWN_USERNAME};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

static RESULT_CONTAINER: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.bw-search__result").expect("Invalid container selector"));

static PRIMARY_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.bw-link--black").expect("Invalid result link selector"));

static ANY_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("Invalid link selector"));

static CSRF_INPUT: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"input[name="csrfmiddlewaretoken"]"#).expect("Invalid token selector")
});

static PROFILE_HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/people/[^/]+/$").expect("Invalid profile link regex"));

/// Extracts every search result on a page
///
/// # Extraction Rules
///
/// - Each `div.bw-search__result` is one candidate result
/// - Its first `a.bw-link--black` is the primary link; without one (or
///   without an `href`) the container is skipped
/// - `id` is the second-to-last `/`-separated segment of the href
/// - `name` is the trimmed link text
/// - `username` is the text of a link to `/people/<name>/`, or `"Unknown"`
///
/// An empty result means the search has no (more) results.
///
/// # Example
///
/// ```
/// use soundtrawl::crawler::extract_records;
/// use url::Url;
///
/// let html = r#"<div class="bw-search__result">
///     <a class="bw-link--black" href="/people/alice/sounds/101/">Rain</a>
///     <a href="/people/alice/">alice</a>
/// </div>"#;
/// let base = Url::parse("https://sounds.example.com").unwrap();
/// let records = extract_records(html, &base);
/// assert_eq!(records[0].id, "101");
/// assert_eq!(records[0].username, "alice");
/// ```
pub fn extract_records(html: &str, base_url: &Url) -> Vec<SearchRecord> {
    let document = Html::parse_document(html);

    document
        .select(&RESULT_CONTAINER)
        .filter_map(|container| parse_container(container, base_url))
        .collect()
}

/// Reads the login form's anti-forgery token, if the page has one
pub fn extract_csrf_token(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    document
        .select(&CSRF_INPUT)
        .find_map(|input| input.value().attr("value"))
        .map(str::to_string)
}

fn parse_container(container: ElementRef<'_>, base_url: &Url) -> Option<SearchRecord> {
    let link = container.select(&PRIMARY_LINK).next()?;
    let href = link.value().attr("href")?;

    let url = match resolve_result_url(href, base_url) {
        Some(url) => url,
        None => {
            tracing::debug!("Skipping result with unusable link {}", href);
            return None;
        }
    };

    let id = href.rsplit('/').nth(1).unwrap_or_default().to_string();
    let name = element_text(link);

    let username = container
        .select(&ANY_LINK)
        .find(|a| {
            a.value()
                .attr("href")
                .map_or(false, |h| PROFILE_HREF.is_match(h))
        })
        .map(element_text)
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| UNKNOWN_USERNAME.to_string());

    Some(SearchRecord {
        id,
        name,
        url,
        username,
    })
}

/// Resolves a result href to an absolute URL ending in `/`
fn resolve_result_url(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let mut url = base_url.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Some(url)
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
