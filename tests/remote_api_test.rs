//! Remote API client against a mock HTTP server

use chrono::{TimeZone, Utc};
use incident_sync::adapters::remote::{RemoteApi, RemoteClient};
use incident_sync::config::{secret_string, RemoteConfig};
use incident_sync::domain::{Channel, SyncError};
use mockito::Matcher;
use serde_json::json;

fn client(base_url: &str) -> RemoteClient {
    let config = RemoteConfig {
        base_url: format!("{base_url}/api"),
        client_name: "hak".to_string(),
        api_key: secret_string("s3cret".to_string()),
        timeout_seconds: 5,
        max_redirects: 2,
        tls_verify: true,
    };
    RemoteClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_fetch_watermark_per_channel() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/external/hak/sync/last")
        .match_header("neuvo-secret", "Bearer s3cret")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "lastSyncIncidents": "2024-03-01T09:00:00.000Z",
                "lastSyncMeta": "2024-02-28 17:30:00"
            })
            .to_string(),
        )
        .expect(2)
        .create_async()
        .await;

    let remote = client(&server.url());
    let data = remote.fetch_watermark(Channel::Data).await.unwrap();
    let meta = remote.fetch_watermark(Channel::Meta).await.unwrap();

    assert_eq!(data.channel, Channel::Data);
    assert_eq!(
        data.timestamp,
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    );
    assert_eq!(
        meta.timestamp,
        Utc.with_ymd_and_hms(2024, 2, 28, 17, 30, 0).unwrap()
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_watermark_field_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/external/hak/sync/last")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "lastSyncIncidents": "2024-03-01T09:00:00Z" }).to_string())
        .create_async()
        .await;

    let err = client(&server.url())
        .fetch_watermark(Channel::Meta)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SyncError::MalformedWatermark {
            channel: Channel::Meta,
            ..
        }
    ));
}

#[tokio::test]
async fn test_null_watermark_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/external/hak/sync/last")
        .with_status(200)
        .with_body(json!({ "lastSyncIncidents": null, "lastSyncMeta": null }).to_string())
        .create_async()
        .await;

    let err = client(&server.url())
        .fetch_watermark(Channel::Data)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "malformed_watermark");
}

#[tokio::test]
async fn test_server_error_is_remote_unavailable() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/external/hak/sync/last")
        .with_status(503)
        .with_body("maintenance")
        .create_async()
        .await;

    let err = client(&server.url())
        .fetch_watermark(Channel::Data)
        .await
        .unwrap_err();

    match err {
        SyncError::RemoteUnavailable(message) => assert!(message.contains("maintenance")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_remote_is_remote_unavailable() {
    let remote = client("http://127.0.0.1:1");
    let err = remote.fetch_watermark(Channel::Data).await.unwrap_err();
    assert_eq!(err.kind(), "remote_unavailable");
}

#[tokio::test]
async fn test_upload_posts_body_with_secret() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/external/hak/sync/data")
        .match_header("neuvo-secret", "Bearer s3cret")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "apiKey": "s3cret",
            "name": "hak",
            "data": [{ "id": 1, "client_safe": true }]
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json!({ "received": 1 }).to_string())
        .create_async()
        .await;

    let ack = client(&server.url())
        .upload(Channel::Data, &json!([{ "id": 1, "client_safe": true }]))
        .await
        .unwrap();

    assert_eq!(ack.status, 201);
    assert_eq!(ack.body, json!({ "received": 1 }));
    assert!(!ack.is_skipped());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_upload_meta_uses_meta_endpoint() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/external/hak/sync/meta")
        .match_body(Matcher::PartialJson(json!({ "data": { "counties": [] } })))
        .with_status(200)
        .create_async()
        .await;

    let ack = client(&server.url())
        .upload(Channel::Meta, &json!({ "counties": [] }))
        .await
        .unwrap();

    assert_eq!(ack.body, serde_json::Value::Null);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rejected_upload_carries_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/external/hak/sync/data")
        .with_status(401)
        .with_body("invalid api key")
        .create_async()
        .await;

    let err = client(&server.url())
        .upload(Channel::Data, &json!([]))
        .await
        .unwrap_err();

    match err {
        SyncError::UploadRejected {
            channel,
            status,
            message,
        } => {
            assert_eq!(channel, Channel::Data);
            assert_eq!(status, 401);
            assert!(message.contains("invalid api key"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_upload_to_unreachable_remote_is_transport_error() {
    let remote = client("http://127.0.0.1:1");
    let err = remote
        .upload(Channel::Data, &json!([{ "id": 1 }]))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Transport(_)), "got {err:?}");
    assert_eq!(err.kind(), "transport_error");
}
