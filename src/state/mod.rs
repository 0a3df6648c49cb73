//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: the active query and the page number about to be fetched
//! - `CrawlPhase`: where the orchestrator is in its per-query state machine
//! - `CrawlOutcome`: how a crawl run ended
//! - `SearchRecord`: one result extracted from a search page

mod crawl_state;
mod record;

// Re-export main types
pub use crawl_state::{CrawlOutcome, CrawlPhase, CrawlState};
pub use record::{SearchRecord, UNKNOWN_USERNAME};
