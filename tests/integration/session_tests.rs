//! Login and search page fetching against a mock site

use crate::common::{alice, login, login_page, mount_login, test_config, SESSION_COOKIE, TOKEN};
use soundtrawl::crawler::{build_search_url, fetch_document};
use soundtrawl::session::Session;
use soundtrawl::{AuthError, FetchError};
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_login_posts_token_and_headers() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&mock_server, dir.path());
    let referer = format!("{}/", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(login_page()))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/home/login/"))
        .and(body_string_contains(format!("csrfmiddlewaretoken={}", TOKEN).as_str()))
        .and(body_string_contains("username=alice"))
        .and(body_string_contains("password=hunter2"))
        .and(header("referer", referer.as_str()))
        .and(header("user-agent", "SoundtrawlTest/1.0"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/home/"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/home/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Welcome"))
        .mount(&mock_server)
        .await;

    let session = Session::authenticate(&config.site, &alice())
        .await
        .expect("login should succeed");

    assert!(session.login_redirects() >= 1);
    assert_eq!(session.base_url().as_str(), referer);
}

#[tokio::test]
async fn test_login_without_redirect_is_rejected() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&mock_server, dir.path());
    mount_login(&mock_server, false).await;

    let result = Session::authenticate(&config.site, &alice()).await;

    match result {
        Err(AuthError::Rejected { username }) => assert_eq!(username, "alice"),
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_token_is_fatal() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&mock_server, dir.path());

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>Maintenance</body></html>"))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/home/login/"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/home/"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = Session::authenticate(&config.site, &alice()).await;
    assert!(matches!(result, Err(AuthError::TokenNotFound { .. })));
}

#[tokio::test]
async fn test_root_error_status() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&mock_server, dir.path());

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let result = Session::authenticate(&config.site, &alice()).await;
    assert!(matches!(
        result,
        Err(AuthError::HttpStatus { status: 503, .. })
    ));
}

#[tokio::test]
async fn test_session_cookie_is_sent_with_searches() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&mock_server, dir.path());
    let session = login(&mock_server, &config).await;

    Mock::given(method("GET"))
        .and(path("/search/"))
        .and(header("cookie", SESSION_COOKIE))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>results</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = build_search_url(session.base_url(), "rain", 1).unwrap();
    let body = fetch_document(&session, &url).await.unwrap();
    assert!(body.contains("results"));
}

#[tokio::test]
async fn test_fetch_document_error_status() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&mock_server, dir.path());
    let session = login(&mock_server, &config).await;

    Mock::given(method("GET"))
        .and(path("/search/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let url = build_search_url(session.base_url(), "rain", 1).unwrap();
    let result = fetch_document(&session, &url).await;
    assert!(matches!(
        result,
        Err(FetchError::HttpStatus { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_fetch_document_network_error() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&mock_server, dir.path());
    let session = login(&mock_server, &config).await;

    // Port 9 (discard) is not listening on the test host
    let url = url::Url::parse("http://127.0.0.1:9/search/?q=rain&page=1").unwrap();
    let result = fetch_document(&session, &url).await;
    assert!(matches!(result, Err(FetchError::Network { .. })));
}

#[tokio::test]
async fn test_login_redirect_count_survives_later_redirects() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&mock_server, dir.path());
    let session = login(&mock_server, &config).await;
    assert_eq!(session.login_redirects(), 1);

    Mock::given(method("GET"))
        .and(path("/r1"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/r2"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/r2"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/r3"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/r3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("end"))
        .mount(&mock_server)
        .await;

    let url = session.base_url().join("/r1").unwrap();
    let body = fetch_document(&session, &url).await.unwrap();

    assert_eq!(body, "end");
    assert_eq!(session.login_redirects(), 1);
}
