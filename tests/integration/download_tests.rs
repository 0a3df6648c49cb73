//! Asset downloads against a mock site

use crate::common::{login, mount_download, test_config};
use soundtrawl::download::{download_asset, DownloadOutcome};
use soundtrawl::state::SearchRecord;
use soundtrawl::DownloadError;
use std::path::Path;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn record(server: &MockServer, user: &str, id: &str, name: &str) -> SearchRecord {
    SearchRecord {
        id: id.to_string(),
        name: name.to_string(),
        url: Url::parse(&format!("{}/people/{}/sounds/{}/", server.uri(), user, id)).unwrap(),
        username: user.to_string(),
    }
}

fn visible_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_download_uses_content_disposition_name() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&mock_server, dir.path());
    let session = login(&mock_server, &config).await;

    mount_download(&mock_server, "alice", "101", Some("101__alice__rain.wav"), b"RIFFdata", 1).await;

    let rec = record(&mock_server, "alice", "101", "Rain");
    let outcome = download_asset(
        &session,
        &rec,
        &config.download.destination_root,
        "rain",
        &config.download,
    )
    .await
    .unwrap();

    let expected = config.download.destination_root.join("rain").join("101__alice__rain.wav");
    assert_eq!(
        outcome,
        DownloadOutcome::Downloaded {
            path: expected.clone(),
            bytes: 8
        }
    );
    assert_eq!(std::fs::read(&expected).unwrap(), b"RIFFdata");
    assert_eq!(
        visible_entries(&config.download.destination_root.join("rain")),
        vec!["101__alice__rain.wav"]
    );
}

#[tokio::test]
async fn test_second_download_is_skipped() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&mock_server, dir.path());
    let session = login(&mock_server, &config).await;

    mount_download(&mock_server, "alice", "101", Some("rain.wav"), b"first", 2).await;

    let rec = record(&mock_server, "alice", "101", "Rain");
    let root = &config.download.destination_root;

    let first = download_asset(&session, &rec, root, "rain", &config.download)
        .await
        .unwrap();
    assert!(matches!(first, DownloadOutcome::Downloaded { .. }));

    let second = download_asset(&session, &rec, root, "rain", &config.download)
        .await
        .unwrap();
    assert_eq!(
        second,
        DownloadOutcome::Skipped {
            path: root.join("rain").join("rain.wav")
        }
    );
    assert_eq!(visible_entries(&root.join("rain")), vec!["rain.wav"]);
}

#[tokio::test]
async fn test_existing_file_is_not_overwritten() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&mock_server, dir.path());
    let session = login(&mock_server, &config).await;

    let query_dir = config.download.destination_root.join("rain");
    std::fs::create_dir_all(&query_dir).unwrap();
    std::fs::write(query_dir.join("rain.wav"), b"original").unwrap();

    mount_download(&mock_server, "bob", "202", Some("rain.wav"), b"different", 1).await;

    let rec = record(&mock_server, "bob", "202", "Rain");
    let outcome = download_asset(
        &session,
        &rec,
        &config.download.destination_root,
        "rain",
        &config.download,
    )
    .await
    .unwrap();

    assert!(matches!(outcome, DownloadOutcome::Skipped { .. }));
    assert_eq!(std::fs::read(query_dir.join("rain.wav")).unwrap(), b"original");
}

#[tokio::test]
async fn test_fallback_name_is_sanitized() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&mock_server, dir.path());
    let session = login(&mock_server, &config).await;

    mount_download(&mock_server, "carol", "303", None, b"x", 1).await;

    let rec = record(&mock_server, "carol", "303", "Rain: take 2?");
    let outcome = download_asset(
        &session,
        &rec,
        &config.download.destination_root,
        "rain",
        &config.download,
    )
    .await
    .unwrap();

    assert_eq!(
        outcome.path(),
        config.download.destination_root.join("rain").join("Rain_ take 2_.wav")
    );
}

#[tokio::test]
async fn test_header_filename_cannot_escape_directory() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&mock_server, dir.path());
    let session = login(&mock_server, &config).await;

    mount_download(&mock_server, "dave", "404", Some("../../evil.wav"), b"x", 1).await;

    let rec = record(&mock_server, "dave", "404", "Evil");
    let outcome = download_asset(
        &session,
        &rec,
        &config.download.destination_root,
        "rain",
        &config.download,
    )
    .await
    .unwrap();

    assert_eq!(
        outcome.path(),
        config.download.destination_root.join("rain").join(".._.._evil.wav")
    );
}

#[tokio::test]
async fn test_error_status_leaves_no_file() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&mock_server, dir.path());
    let session = login(&mock_server, &config).await;

    Mock::given(method("GET"))
        .and(path("/people/erin/sounds/505/download/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let rec = record(&mock_server, "erin", "505", "Gone");
    let result = download_asset(
        &session,
        &rec,
        &config.download.destination_root,
        "rain",
        &config.download,
    )
    .await;

    assert!(matches!(
        result,
        Err(DownloadError::HttpStatus { status: 404, .. })
    ));
    assert!(visible_entries(&config.download.destination_root.join("rain")).is_empty());
}

#[tokio::test]
async fn test_truncated_body_leaves_no_file() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&mock_server, dir.path());
    let session = login(&mock_server, &config).await;

    // Promises 1000 bytes, sends 10, then hangs up
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = vec![0u8; 4096];
        let _ = socket.read(&mut request).await.unwrap();
        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\n\
                  Content-Length: 1000\r\n\
                  Content-Disposition: attachment; filename=\"cut.wav\"\r\n\
                  \r\n\
                  0123456789",
            )
            .await
            .unwrap();
        let _ = socket.shutdown().await;
    });

    let rec = SearchRecord {
        id: "606".to_string(),
        name: "Cut".to_string(),
        url: Url::parse(&format!("http://{}/people/frank/sounds/606/", addr)).unwrap(),
        username: "frank".to_string(),
    };
    let result = download_asset(
        &session,
        &rec,
        &config.download.destination_root,
        "rain",
        &config.download,
    )
    .await;
    server.await.unwrap();

    assert!(matches!(result, Err(DownloadError::Network { .. })));
    let query_dir = config.download.destination_root.join("rain");
    assert!(!query_dir.join("cut.wav").exists());
    assert!(visible_entries(&query_dir).is_empty());
}
