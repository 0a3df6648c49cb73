//! Integration tests for Soundtrawl
//!
//! These tests use wiremock to stand in for the sound site and exercise
//! login, search page fetching, downloads and full crawl runs end-to-end.

mod common;
mod download_tests;
mod session_tests;
