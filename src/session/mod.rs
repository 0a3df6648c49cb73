//! Authenticated session management
//!
//! This module establishes the logged-in HTTP session every other component
//! borrows:
//! - Building the cookie-keeping HTTP client
//! - Reading the anti-forgery token from the site root
//! - Submitting the login form and detecting success

mod client;

pub use client::{build_http_client, MAX_REDIRECTS};

use crate::config::SiteConfig;
use crate::crawler::extract_csrf_token;
use crate::interact::Credentials;
use crate::AuthError;
use reqwest::header::{REFERER, USER_AGENT};
use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use url::Url;

/// Path the login form is posted to
pub const LOGIN_PATH: &str = "/home/login/";

/// Name of the hidden anti-forgery form field
pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";

/// An authenticated HTTP session
///
/// The only way to obtain one is [`Session::authenticate`]; a failed login
/// yields an error and no session. After login the session is only read.
#[derive(Debug)]
pub struct Session {
    client: Client,
    base_url: Url,
    login_redirects: usize,
}

impl Session {
    /// Logs into the site and returns the authenticated session
    ///
    /// # Login Flow
    ///
    /// 1. GET the site root
    /// 2. Read the hidden anti-forgery token from the page
    /// 3. POST the login form with the token, credentials, `Referer` and `User-Agent`
    /// 4. Treat a redirected response as success; a re-rendered form means rejection
    ///
    /// Nothing is retried.
    ///
    /// # Errors
    ///
    /// * `AuthError::TokenNotFound` - The root page carries no token field
    /// * `AuthError::Rejected` - The login response was not redirected
    /// * `AuthError::HttpStatus` - The root page returned a non-2xx status
    /// * `AuthError::Network` - A request could not be completed
    pub async fn authenticate(
        site: &SiteConfig,
        credentials: &Credentials,
    ) -> Result<Self, AuthError> {
        let base_url = Url::parse(&site.base_url)?;
        let redirects = Arc::new(AtomicUsize::new(0));
        let client = build_http_client(site, Arc::clone(&redirects)).map_err(|source| {
            AuthError::Network {
                url: base_url.to_string(),
                source,
            }
        })?;

        tracing::debug!("Fetching login token from {}", base_url);
        let root = client
            .get(base_url.clone())
            .send()
            .await
            .map_err(|source| AuthError::Network {
                url: base_url.to_string(),
                source,
            })?;

        let status = root.status();
        if !status.is_success() {
            return Err(AuthError::HttpStatus {
                url: base_url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = root.text().await.map_err(|source| AuthError::Network {
            url: base_url.to_string(),
            source,
        })?;

        let token = extract_csrf_token(&body).ok_or_else(|| AuthError::TokenNotFound {
            url: base_url.to_string(),
        })?;

        let login_url = base_url.join(LOGIN_PATH)?;
        let form = [
            (CSRF_FIELD, token.as_str()),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];

        redirects.store(0, Ordering::Relaxed);
        let response = client
            .post(login_url.clone())
            .header(REFERER, base_url.as_str())
            .header(USER_AGENT, site.user_agent.as_str())
            .form(&form)
            .send()
            .await
            .map_err(|source| AuthError::Network {
                url: login_url.to_string(),
                source,
            })?;

        let followed = redirects.load(Ordering::Relaxed);
        tracing::debug!(
            "Login response {} at {} after {} redirect(s)",
            response.status(),
            response.url(),
            followed
        );

        if followed == 0 {
            return Err(AuthError::Rejected {
                username: credentials.username.clone(),
            });
        }

        tracing::info!("Logged in successfully as {}", credentials.username);
        Ok(Self {
            client,
            base_url,
            login_redirects: followed,
        })
    }

    /// The cookie-carrying client to issue requests through
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The site root every path is resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Redirects the login POST went through
    ///
    /// Captured when the session was created; later requests do not change it.
    pub fn login_redirects(&self) -> usize {
        self.login_redirects
    }
}
