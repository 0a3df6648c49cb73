//! Crawler module for search pagination and result processing
//!
//! This module contains the core crawling logic, including:
//! - Search URL construction and page fetching
//! - HTML extraction of search results
//! - The pagination state machine
//! - The whole-run driver tying credentials, login and crawl together

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::Coordinator;
pub use fetcher::{build_search_url, fetch_document, SEARCH_PATH};
pub use parser::{extract_csrf_token, extract_records};

use crate::config::Config;
use crate::interact::{CredentialStore, Credentials, Prompter};
use crate::output::CrawlSummary;
use crate::session::Session;
use crate::state::CrawlOutcome;
use crate::TrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for a run. It will:
/// 1. Load stored credentials, prompting (and saving) when none are usable
/// 2. Log in; a failed login ends the run before any search is issued
/// 3. Take the first query from the config or the prompter
/// 4. Crawl until a terminal state
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - The run reached a terminal state
/// * `Err(TrawlError)` - Credentials could not be obtained or login failed
///
/// # Example
///
/// ```no_run
/// use soundtrawl::config::Config;
/// use soundtrawl::crawler::run;
/// use soundtrawl::interact::{JsonCredentialStore, TerminalPrompter};
///
/// # async fn example() -> Result<(), soundtrawl::TrawlError> {
/// let config = Config::default();
/// let store = JsonCredentialStore::new(&config.credentials.path);
/// let mut prompter = TerminalPrompter::stdio();
/// let summary = run(&config, &store, &mut prompter).await?;
/// println!("{} downloaded", summary.downloaded());
/// # Ok(())
/// # }
/// ```
pub async fn run(
    config: &Config,
    store: &dyn CredentialStore,
    prompter: &mut dyn Prompter,
) -> Result<CrawlSummary, TrawlError> {
    let session = {
        let credentials = obtain_credentials(store, prompter)?;
        Session::authenticate(&config.site, &credentials).await?
    };

    let query = config
        .crawl
        .query
        .clone()
        .or_else(|| prompter.search_query());

    match query {
        Some(query) => Ok(Coordinator::new(&session, config)
            .crawl(&query, prompter)
            .await),
        None => {
            tracing::info!("No search query given, nothing to do");
            let mut summary = CrawlSummary::new();
            summary.finish(CrawlOutcome::Done);
            Ok(summary)
        }
    }
}

/// Returns stored credentials, or prompts for new ones and stores them
fn obtain_credentials(
    store: &dyn CredentialStore,
    prompter: &mut dyn Prompter,
) -> Result<Credentials, TrawlError> {
    match store.load() {
        Ok(Some(credentials)) => {
            tracing::info!("Using saved credentials.");
            return Ok(credentials);
        }
        Ok(None) => {}
        Err(e) => tracing::warn!("Could not load saved credentials: {}", e),
    }

    let credentials = prompter.credentials()?;
    if let Err(e) = store.save(&credentials) {
        tracing::warn!("Could not save credentials: {}", e);
    }
    Ok(credentials)
}
