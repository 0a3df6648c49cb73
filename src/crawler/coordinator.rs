//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the pagination state machine that drives a crawl:
//! - Fetching each search page and extracting its records
//! - Downloading every record of a page, one after another
//! - Advancing pages with a fixed delay
//! - Asking the operator whether to continue or switch query

use crate::config::Config;
use crate::crawler::fetcher::{build_search_url, fetch_document};
use crate::crawler::parser::extract_records;
use crate::download::{download_asset, DownloadOutcome};
use crate::interact::Prompter;
use crate::output::CrawlSummary;
use crate::session::Session;
use crate::state::{CrawlOutcome, CrawlPhase, CrawlState, SearchRecord};
use crate::TrawlError;
use std::time::Duration;

/// Drives one crawl run over an authenticated session
pub struct Coordinator<'a> {
    session: &'a Session,
    config: &'a Config,
    phase: CrawlPhase,
    summary: CrawlSummary,
}

impl<'a> Coordinator<'a> {
    /// Creates a coordinator that borrows the session for the whole run
    pub fn new(session: &'a Session, config: &'a Config) -> Self {
        Self {
            session,
            config,
            phase: CrawlPhase::AwaitingPage,
            summary: CrawlSummary::new(),
        }
    }

    /// Runs the state machine until a terminal phase
    ///
    /// # Transitions
    ///
    /// | Phase | Event | Next |
    /// |-------|-------|------|
    /// | AwaitingPage | fetch failed | Aborted |
    /// | AwaitingPage | no records | Exhausted |
    /// | AwaitingPage | records | ProcessingPage |
    /// | ProcessingPage | all records attempted | AdvancingPage |
    /// | AdvancingPage | operator continues | AwaitingPage (page + 1) |
    /// | AdvancingPage | operator declines | AwaitingNewQuery |
    /// | AwaitingNewQuery | new query given | AwaitingPage (page 1) |
    /// | AwaitingNewQuery | otherwise | Done |
    pub async fn crawl(mut self, initial_query: &str, prompter: &mut dyn Prompter) -> CrawlSummary {
        let mut state = CrawlState::new(initial_query);
        self.summary.start_query(state.query());

        let mut records: Vec<SearchRecord> = Vec::new();
        let mut outcome = CrawlOutcome::Done;

        while !self.phase.is_terminal() {
            tracing::debug!(
                phase = %self.phase,
                query = state.query(),
                page = state.page(),
                "crawl step"
            );

            match self.phase {
                CrawlPhase::AwaitingPage => match self.fetch_page(&state).await {
                    Ok(found) if found.is_empty() => {
                        tracing::info!("No more sounds found or end of results.");
                        outcome = self.conclude(CrawlOutcome::Exhausted);
                    }
                    Ok(found) => {
                        tracing::info!(
                            "Found {} sounds on page {} for query '{}'",
                            found.len(),
                            state.page(),
                            state.query()
                        );
                        records = found;
                        self.phase = CrawlPhase::ProcessingPage;
                    }
                    Err(e) => {
                        tracing::error!("Could not get the search page: {}", e);
                        outcome = self.conclude(CrawlOutcome::Aborted(e.to_string()));
                    }
                },

                CrawlPhase::ProcessingPage => {
                    let page_records = std::mem::take(&mut records);
                    self.download_page(&page_records, state.query()).await;
                    self.phase = CrawlPhase::AdvancingPage;
                }

                CrawlPhase::AdvancingPage => {
                    state.advance();
                    tracing::info!("Going to page {}...", state.page());

                    pause_between_pages(self.config.crawl.page_delay()).await;

                    self.phase = if prompter.continue_to_next_page(state.page()) {
                        CrawlPhase::AwaitingPage
                    } else {
                        CrawlPhase::AwaitingNewQuery
                    };
                }

                CrawlPhase::AwaitingNewQuery => {
                    match prompter
                        .search_again()
                        .then(|| prompter.search_query())
                        .flatten()
                    {
                        Some(query) => {
                            state.switch_query(query);
                            self.summary.start_query(state.query());
                            self.phase = CrawlPhase::AwaitingPage;
                        }
                        None => outcome = self.conclude(CrawlOutcome::Done),
                    }
                }

                CrawlPhase::Exhausted | CrawlPhase::Aborted | CrawlPhase::Done => break,
            }
        }

        tracing::info!("Crawl finished: {}", outcome);
        self.summary.finish(outcome);
        self.summary
    }

    /// Enters the terminal phase that ends the run with `outcome`
    fn conclude(&mut self, outcome: CrawlOutcome) -> CrawlOutcome {
        self.phase = outcome.phase();
        outcome
    }

    /// Fetches the current page and extracts its records
    async fn fetch_page(&mut self, state: &CrawlState) -> Result<Vec<SearchRecord>, TrawlError> {
        let url = build_search_url(self.session.base_url(), state.query(), state.page())?;
        tracing::info!("Searching: {}", url);

        let html = fetch_document(self.session, &url).await?;
        let found = extract_records(&html, self.session.base_url());

        self.summary.record_page(found.len());
        Ok(found)
    }

    /// Downloads each record in order; failures are logged and skipped
    async fn download_page(&mut self, records: &[SearchRecord], query: &str) {
        let config = self.config;
        let download = &config.download;

        for record in records {
            tracing::info!(
                "Downloading sound ID: {} by user: {}",
                record.id,
                record.username
            );

            let result = download_asset(
                self.session,
                record,
                &download.destination_root,
                query,
                download,
            )
            .await;

            match &result {
                Ok(DownloadOutcome::Downloaded { path, bytes }) => {
                    tracing::info!("Downloaded: {} ({} bytes)", path.display(), bytes);
                }
                Ok(DownloadOutcome::Skipped { path }) => {
                    tracing::info!("File already exists: {}", path.display());
                }
                Err(e) => {
                    tracing::warn!("Failed to download sound {}: {}", record.id, e);
                }
            }

            self.summary.record_download(&result);
        }
    }
}

/// Waits out the configured gap before the next page; zero means no wait
async fn pause_between_pages(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
