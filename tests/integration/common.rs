//! Shared fixtures: a mock sound site and in-memory collaborators

use soundtrawl::config::Config;
use soundtrawl::interact::{CredentialStore, Credentials};
use soundtrawl::session::Session;
use soundtrawl::CredentialError;
use std::cell::RefCell;
use std::path::Path;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "tok-123";
pub const SESSION_COOKIE: &str = "sessionid=abc123";

pub fn login_page() -> String {
    format!(
        r#"<html><body><form method="post" action="/home/login/">
        <input type="hidden" name="csrfmiddlewaretoken" value="{}">
        <input name="username"><input name="password" type="password">
        </form></body></html>"#,
        TOKEN
    )
}

/// Mounts the site root and the login endpoint
///
/// When `accept` is true the login POST redirects to `/home/` and sets a
/// session cookie; otherwise the login form is rendered again.
pub async fn mount_login(server: &MockServer, accept: bool) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(login_page()))
        .mount(server)
        .await;

    let login_response = if accept {
        ResponseTemplate::new(302)
            .insert_header("Location", "/home/")
            .insert_header("Set-Cookie", format!("{}; Path=/", SESSION_COOKIE).as_str())
    } else {
        ResponseTemplate::new(200).set_body_string(login_page())
    };

    Mock::given(method("POST"))
        .and(path("/home/login/"))
        .respond_with(login_response)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/home/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Welcome</html>"))
        .mount(server)
        .await;
}

/// Config pointing at the mock server with no page delay
pub fn test_config(server: &MockServer, dest: &Path) -> Config {
    let mut config = Config::default();
    config.site.base_url = server.uri();
    config.site.user_agent = "SoundtrawlTest/1.0".to_string();
    config.crawl.page_delay_ms = 0;
    config.download.destination_root = dest.join("downloads");
    config.credentials.path = dest.join("creds.json");
    config
}

pub fn alice() -> Credentials {
    Credentials::new("alice", "hunter2")
}

/// Logs into a mock server that accepts the login
pub async fn login(server: &MockServer, config: &Config) -> Session {
    mount_login(server, true).await;
    Session::authenticate(&config.site, &alice())
        .await
        .expect("login against mock server failed")
}

/// A result page with one container per `(id, user, name)`
pub fn results_page(results: &[(&str, &str, &str)]) -> String {
    let containers: String = results
        .iter()
        .map(|(id, user, name)| {
            format!(
                r#"<div class="bw-search__result">
                    <a class="bw-link--black" href="/people/{user}/sounds/{id}/">{name}</a>
                    <a href="/people/{user}/">{user}</a>
                </div>"#,
                id = id,
                user = user,
                name = name
            )
        })
        .collect();

    format!(
        r#"<html><body><div class="bw-search__results">{}</div></body></html>"#,
        containers
    )
}

pub fn empty_results_page() -> String {
    r#"<html><body><p>No sounds found</p></body></html>"#.to_string()
}

/// Mounts one page of search results, expected to be fetched `times` times
pub async fn mount_search(server: &MockServer, query: &str, page: u32, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path("/search/"))
        .and(query_param("q", query))
        .and(query_param("page", page.to_string().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(times)
        .mount(server)
        .await;
}

/// Mounts the download endpoint of one sound
pub async fn mount_download(
    server: &MockServer,
    user: &str,
    id: &str,
    filename: Option<&str>,
    body: &[u8],
    times: u64,
) {
    let mut response = ResponseTemplate::new(200).set_body_bytes(body.to_vec());
    if let Some(filename) = filename {
        response = response.insert_header(
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename).as_str(),
        );
    }

    Mock::given(method("GET"))
        .and(path(format!("/people/{}/sounds/{}/download/", user, id).as_str()))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

/// Credential store kept in memory
#[derive(Default)]
pub struct MemoryStore {
    pub stored: Option<Credentials>,
    pub broken: bool,
    pub saved: RefCell<Vec<Credentials>>,
}

impl MemoryStore {
    pub fn with(credentials: Credentials) -> Self {
        Self {
            stored: Some(credentials),
            ..Self::default()
        }
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self) -> Result<Option<Credentials>, CredentialError> {
        if self.broken {
            return Err(CredentialError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "unreadable",
            )));
        }
        Ok(self.stored.clone())
    }

    fn save(&self, credentials: &Credentials) -> Result<(), CredentialError> {
        self.saved.borrow_mut().push(credentials.clone());
        Ok(())
    }
}
