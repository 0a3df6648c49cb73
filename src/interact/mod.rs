//! Collaborators the crawl core consults but does not own
//!
//! This module provides:
//! - `Credentials` and the `CredentialStore` trait, with a JSON file store
//! - The `Prompter` trait for operator decisions, with a terminal
//!   implementation and a scripted one for headless runs

mod credentials;
mod scripted;
mod terminal;

pub use credentials::JsonCredentialStore;
pub use scripted::ScriptedPrompter;
pub use terminal::{normalize_query, TerminalPrompter};

use crate::CredentialError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Login credentials for the site
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns true if both fields are filled in
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Persistent credential storage
pub trait CredentialStore {
    /// Loads stored credentials
    ///
    /// Returns `Ok(None)` when nothing usable is stored, in which case the
    /// caller must prompt.
    fn load(&self) -> Result<Option<Credentials>, CredentialError>;

    /// Stores credentials for later runs
    fn save(&self, credentials: &Credentials) -> Result<(), CredentialError>;
}

/// Interactive decisions the crawl needs from its operator
pub trait Prompter {
    /// Asks for a username and password
    fn credentials(&mut self) -> std::io::Result<Credentials>;

    /// Asks for a search query; `None` means no query was given
    fn search_query(&mut self) -> Option<String>;

    /// Asks whether to fetch `next_page` of the current query
    fn continue_to_next_page(&mut self, next_page: u32) -> bool;

    /// Asks whether to start another search
    fn search_again(&mut self) -> bool;
}
