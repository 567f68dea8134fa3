use httpmock::prelude::*;

use legkor_hungaromet::transport::{HttpTransport, HungarometTransport};

#[tokio::test]
async fn downloads_archive_bytes() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/archive.csv.gz");
            then.status(200).body(vec![0x1f, 0x8b, 0x08, 0x00]);
        })
        .await;

    let transport = HttpTransport::new();
    let bytes = transport.get(&server.url("/archive.csv.gz")).await.unwrap();

    mock.assert_async().await;
    assert_eq!(bytes, vec![0x1f, 0x8b, 0x08, 0x00]);
}

#[tokio::test]
async fn http_error_status_maps_to_retryable_fetch() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/missing.csv.gz");
            then.status(404);
        })
        .await;

    let transport = HttpTransport::new();
    let err = transport.get(&server.url("/missing.csv.gz")).await.unwrap_err();
    assert!(err.is_retryable());
}

#[tokio::test]
async fn connection_failure_maps_to_retryable_fetch() {
    // Nothing listens on this port.
    let transport = HttpTransport::new();
    let err = transport
        .get("http://127.0.0.1:1/archive.csv.gz")
        .await
        .unwrap_err();
    assert!(err.is_retryable());
}
