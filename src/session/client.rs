//! HTTP client construction

use crate::config::SiteConfig;
use reqwest::{redirect::Policy, Client};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Longest redirect chain followed before a request fails
pub const MAX_REDIRECTS: usize = 10;

/// Builds an HTTP client with proper configuration
///
/// The client keeps cookies between requests, sends the configured
/// User-Agent, and follows redirects while recording the length of the
/// current chain in `redirect_counter`.
///
/// # Example
///
/// ```no_run
/// use soundtrawl::config::SiteConfig;
/// use soundtrawl::session::build_http_client;
/// use std::sync::atomic::AtomicUsize;
/// use std::sync::Arc;
///
/// let client = build_http_client(&SiteConfig::default(), Arc::new(AtomicUsize::new(0))).unwrap();
/// ```
pub fn build_http_client(
    site: &SiteConfig,
    redirect_counter: Arc<AtomicUsize>,
) -> Result<Client, reqwest::Error> {
    let policy = Policy::custom(move |attempt| {
        let count = attempt.previous().len();
        redirect_counter.store(count, Ordering::Relaxed);
        if count > MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else {
            attempt.follow()
        }
    });

    Client::builder()
        .user_agent(site.user_agent.as_str())
        .cookie_store(true)
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .redirect(policy)
        .gzip(true)
        .brotli(true)
        .build()
}
