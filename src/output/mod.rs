//! Output module for crawl run reporting
//!
//! This module handles:
//! - Accumulating per-run and per-query counters while crawling
//! - Printing the end-of-run summary

pub mod stats;

pub use stats::{print_summary, CrawlSummary, QueryReport};
