//! Crawl state definitions for the pagination state machine
use std::fmt;

/// The active query and the next page to fetch for it
///
/// `page` never decreases while the query stays the same, and is reset to 1
/// exactly when the query changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlState {
    query: String,
    page: u32,
}

impl CrawlState {
    /// Starts a query at page 1
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Moves to the following page of the same query
    pub fn advance(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    /// Replaces the query and restarts pagination
    pub fn switch_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }
}

/// Position of the orchestrator in its state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    // ===== Active States =====
    /// About to fetch the current page of the current query
    AwaitingPage,

    /// Downloading the records of the page just fetched
    ProcessingPage,

    /// Page done; moving to the next one after the fixed delay
    AdvancingPage,

    /// Operator declined the next page; asking for another query
    AwaitingNewQuery,

    // ===== Terminal States =====
    /// The search returned a page without results
    Exhausted,

    /// A search page could not be fetched
    Aborted,

    /// The operator chose to stop
    Done,
}

impl CrawlPhase {
    /// Returns true if the run ends in this phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Exhausted | Self::Aborted | Self::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitingPage => "awaiting_page",
            Self::ProcessingPage => "processing_page",
            Self::AdvancingPage => "advancing_page",
            Self::AwaitingNewQuery => "awaiting_new_query",
            Self::Exhausted => "exhausted",
            Self::Aborted => "aborted",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a crawl run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// No more results for the last query
    Exhausted,

    /// A search page fetch failed; carries the reported error
    Aborted(String),

    /// The operator declined to continue
    Done,
}

impl CrawlOutcome {
    /// The terminal phase matching this outcome
    pub fn phase(&self) -> CrawlPhase {
        match self {
            Self::Exhausted => CrawlPhase::Exhausted,
            Self::Aborted(_) => CrawlPhase::Aborted,
            Self::Done => CrawlPhase::Done,
        }
    }
}

impl fmt::Display for CrawlOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted => write!(f, "no more results"),
            Self::Aborted(reason) => write!(f, "aborted: {}", reason),
            Self::Done => write!(f, "stopped by operator"),
        }
    }
}
