//! Statistics gathered during a crawl run
//!
//! This module provides the counters the orchestrator updates as it goes and
//! the console rendering used at the end of a run.

use crate::download::DownloadOutcome;
use crate::state::CrawlOutcome;
use crate::DownloadError;
use chrono::{DateTime, Duration, Utc};

/// Counters for a single query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryReport {
    /// The query as sent to the site
    pub query: String,

    /// Number of result pages fetched
    pub pages_fetched: u32,

    /// Records extracted across those pages
    pub records_found: u64,

    pub downloaded: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl QueryReport {
    fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            pages_fetched: 0,
            records_found: 0,
            downloaded: 0,
            skipped: 0,
            failed: 0,
        }
    }
}

/// Crawl run summary
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run reached a terminal state
    pub finished_at: Option<DateTime<Utc>>,

    /// Total bytes written to new files
    pub bytes_downloaded: u64,

    /// One entry per query, in the order they were searched
    pub queries: Vec<QueryReport>,

    /// Terminal state of the run, once finished
    pub outcome: Option<CrawlOutcome>,
}

impl Default for CrawlSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlSummary {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            bytes_downloaded: 0,
            queries: Vec::new(),
            outcome: None,
        }
    }

    /// Opens a new per-query report
    pub fn start_query(&mut self, query: &str) {
        self.queries.push(QueryReport::new(query));
    }

    /// Records a fetched page and the number of records it yielded
    pub fn record_page(&mut self, records: usize) {
        if let Some(report) = self.queries.last_mut() {
            report.pages_fetched += 1;
            report.records_found += records as u64;
        }
    }

    /// Records the result of one download attempt
    pub fn record_download(&mut self, result: &Result<DownloadOutcome, DownloadError>) {
        if let Ok(DownloadOutcome::Downloaded { bytes, .. }) = result {
            self.bytes_downloaded += bytes;
        }

        if let Some(report) = self.queries.last_mut() {
            match result {
                Ok(DownloadOutcome::Downloaded { .. }) => report.downloaded += 1,
                Ok(DownloadOutcome::Skipped { .. }) => report.skipped += 1,
                Err(_) => report.failed += 1,
            }
        }
    }

    /// Marks the run as finished
    pub fn finish(&mut self, outcome: CrawlOutcome) {
        self.finished_at = Some(Utc::now());
        self.outcome = Some(outcome);
    }

    pub fn pages_fetched(&self) -> u64 {
        self.queries.iter().map(|q| q.pages_fetched as u64).sum()
    }

    pub fn records_found(&self) -> u64 {
        self.queries.iter().map(|q| q.records_found).sum()
    }

    pub fn downloaded(&self) -> u64 {
        self.queries.iter().map(|q| q.downloaded).sum()
    }

    pub fn skipped(&self) -> u64 {
        self.queries.iter().map(|q| q.skipped).sum()
    }

    pub fn failed(&self) -> u64 {
        self.queries.iter().map(|q| q.failed).sum()
    }

    /// Download attempts made, whatever their result
    pub fn download_attempts(&self) -> u64 {
        self.downloaded() + self.skipped() + self.failed()
    }

    /// Wall-clock duration of the run, if finished
    pub fn duration(&self) -> Option<Duration> {
        self.finished_at.map(|finished| finished - self.started_at)
    }
}

/// Prints the run summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Overview:");
    println!("  Pages fetched: {}", summary.pages_fetched());
    println!("  Sounds found: {}", summary.records_found());
    println!("  Downloaded: {}", summary.downloaded());
    println!("  Already present: {}", summary.skipped());
    println!("  Failed: {}", summary.failed());
    println!("  Bytes written: {}", summary.bytes_downloaded);
    if let Some(duration) = summary.duration() {
        println!("  Duration: {}s", duration.num_seconds());
    }
    println!();

    if !summary.queries.is_empty() {
        println!("Queries:");
        for report in &summary.queries {
            println!(
                "  {}: {} page(s), {} found, {} downloaded, {} skipped, {} failed",
                report.query,
                report.pages_fetched,
                report.records_found,
                report.downloaded,
                report.skipped,
                report.failed
            );
        }
        println!();
    }

    match &summary.outcome {
        Some(outcome) => println!("Result: {}", outcome),
        None => println!("Result: unfinished"),
    }
}
