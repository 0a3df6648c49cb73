//! Pre-recorded operator answers, for headless runs and tests

use super::{Credentials, Prompter};
use std::collections::VecDeque;

/// Prompter that replays queued answers
///
/// Once a queue runs dry the answer is "no" (or no query), which always
/// drives the crawl towards a terminal state.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    credentials: Option<Credentials>,
    queries: VecDeque<String>,
    next_page: VecDeque<bool>,
    search_again: VecDeque<bool>,
    pages_offered: Vec<u32>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_queries<I, S>(mut self, queries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.queries.extend(queries.into_iter().map(Into::into));
        self
    }

    pub fn with_next_page_answers(mut self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.next_page.extend(answers);
        self
    }

    pub fn with_search_again_answers(mut self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.search_again.extend(answers);
        self
    }

    /// Page numbers offered through `continue_to_next_page`, in order
    pub fn pages_offered(&self) -> &[u32] {
        &self.pages_offered
    }
}

impl Prompter for ScriptedPrompter {
    fn credentials(&mut self) -> std::io::Result<Credentials> {
        self.credentials.clone().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "no scripted credentials",
            )
        })
    }

    fn search_query(&mut self) -> Option<String> {
        self.queries.pop_front()
    }

    fn continue_to_next_page(&mut self, next_page: u32) -> bool {
        self.pages_offered.push(next_page);
        self.next_page.pop_front().unwrap_or(false)
    }

    fn search_again(&mut self) -> bool {
        self.search_again.pop_front().unwrap_or(false)
    }
}
