/// Complete Resolution Flow Test
///
/// HTTP request → façade → coalescer → cache miss → UDP upstream → cache → response

#[path = "../common/mod.rs"]
mod common;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use common::upstream::FIXED_REPLY;
use common::{FakeUpstream, TestServer, TestServerBuilder};
use std::time::Duration;

const QUERY: [u8; 17] = [
    0x00, 0x2a, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, b'a', 0x00,
    0x00, 0x01,
];

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

// ============================================================================
// Full Resolution Flow Tests
// ============================================================================

#[tokio::test]
async fn test_post_resolves_through_upstream() {
    let upstream = FakeUpstream::start().await.unwrap();
    let server = TestServer::start(upstream.addr()).await.unwrap();

    let response = client()
        .post(server.url("/dns-query"))
        .header("content-type", "application/dns-message")
        .body(QUERY.to_vec())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"],
        "application/dns-message"
    );
    assert_eq!(response.bytes().await.unwrap().as_ref(), &FIXED_REPLY);
    assert_eq!(upstream.queries(), 1);
}

#[tokio::test]
async fn test_get_then_post_served_from_cache() {
    let upstream = FakeUpstream::start().await.unwrap();
    let server = TestServer::start(upstream.addr()).await.unwrap();
    let encoded = URL_SAFE_NO_PAD.encode(QUERY);

    let get = client()
        .get(server.url(&format!("/dns-query?dns={}", encoded)))
        .send()
        .await
        .unwrap();
    assert_eq!(get.status(), 200);
    assert_eq!(get.bytes().await.unwrap().as_ref(), &FIXED_REPLY);

    let post = client()
        .post(server.url("/"))
        .body(QUERY.to_vec())
        .send()
        .await
        .unwrap();
    assert_eq!(post.bytes().await.unwrap().as_ref(), &FIXED_REPLY);

    assert_eq!(upstream.queries(), 1);
    assert_eq!(server.cache.len(), 1);
}

#[tokio::test]
async fn test_unresponsive_upstream_returns_500() {
    let upstream = FakeUpstream::unresponsive().await.unwrap();
    let server = TestServerBuilder::new(upstream.addr())
        .with_timeout(Duration::from_millis(150))
        .build()
        .await
        .unwrap();

    let response = client()
        .post(server.url("/dns-query"))
        .body(QUERY.to_vec())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    assert_eq!(response.text().await.unwrap(), "Failed to send DNS query");
    assert!(server.cache.is_empty());
    assert_eq!(server.metrics.snapshot().upstream_failures, 1);
}

#[tokio::test]
async fn test_missing_query_never_reaches_upstream() {
    let upstream = FakeUpstream::start().await.unwrap();
    let server = TestServer::start(upstream.addr()).await.unwrap();

    let response = client().get(server.url("/dns-query")).send().await.unwrap();

    assert_eq!(response.status(), 400);
    assert_eq!(response.text().await.unwrap(), "No DNS query provided");
    assert_eq!(upstream.queries(), 0);
}

#[tokio::test]
async fn test_expired_entries_swept() {
    let upstream = FakeUpstream::start().await.unwrap();
    let server = TestServerBuilder::new(upstream.addr())
        .with_cache_ttl(Duration::from_millis(100))
        .build()
        .await
        .unwrap();

    client()
        .post(server.url("/"))
        .body(QUERY.to_vec())
        .send()
        .await
        .unwrap();
    assert_eq!(server.cache.len(), 1);

    tokio::time::sleep(Duration::from_millis(200)).await;
    server.sweep.execute();

    assert!(server.cache.is_empty());

    server.shutdown();
}

#[tokio::test]
async fn test_stats_reflect_traffic() {
    let upstream = FakeUpstream::start().await.unwrap();
    let server = TestServer::start(upstream.addr()).await.unwrap();

    for _ in 0..3 {
        client()
            .post(server.url("/"))
            .body(QUERY.to_vec())
            .send()
            .await
            .unwrap();
    }

    let stats = client().get(server.url("/stats")).send().await.unwrap();
    let body = stats.text().await.unwrap();

    assert!(body.contains("\"upstream_queries\":1"));
    assert!(body.contains("\"entries\":1"));
}
