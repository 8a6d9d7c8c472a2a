//! Integration tests for the resolver against a local metadata API stub.

use std::collections::HashMap;
use std::time::Duration;

use axum::Router;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use serde_json::json;
use sluice_core::GatewayError;
use sluice_core::config::UpstreamConfig;
use sluice_core::resolve::MediaResolver;
use tokio::net::TcpListener;

/// Binds a throwaway metadata API stub on 127.0.0.1:0.
async fn spawn_api_stub(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}")
}

fn resolver_for(base: &str) -> MediaResolver {
    let config = UpstreamConfig {
        api_base: format!("{base}/api/"),
        ..UpstreamConfig::default()
    };
    MediaResolver::new(&config)
}

#[tokio::test]
async fn resolves_a_full_upstream_payload() {
    let app = Router::new().route(
        "/api/",
        get(|| async {
            Json(json!({
                "code": 0,
                "msg": "success",
                "data": {
                    "title": "a clip",
                    "cover": "https://cdn.example/cover.jpg",
                    "hdplay": "https://cdn.example/hd.mp4",
                    "play": "https://cdn.example/sd.mp4",
                    "wmplay": "https://cdn.example/wm.mp4",
                    "author": {"unique_id": "someone"},
                    "duration": 14,
                }
            }))
        }),
    );
    let base = spawn_api_stub(app).await;

    let resolved = resolver_for(&base)
        .resolve("https://www.tiktok.com/@someone/video/1")
        .await
        .unwrap();

    assert_eq!(resolved.title, "a clip");
    assert_eq!(resolved.download_url, "https://cdn.example/hd.mp4");
    assert_eq!(
        resolved.thumbnail_url.as_deref(),
        Some("https://cdn.example/cover.jpg")
    );
    assert_eq!(resolved.duration, Some(14.0));
}

#[tokio::test]
async fn source_url_survives_query_encoding() {
    // The stub echoes the received `url` parameter back as the title.
    let app = Router::new().route(
        "/api/",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            Json(json!({
                "code": 0,
                "data": {
                    "title": params.get("url").cloned().unwrap_or_default(),
                    "play": "https://cdn.example/sd.mp4",
                }
            }))
        }),
    );
    let base = spawn_api_stub(app).await;

    let source = "https://www.tiktok.com/@someone/video/1?is_copy_url=1&foo=bar baz";
    let resolved = resolver_for(&base).resolve(source).await.unwrap();
    assert_eq!(resolved.title, source);
}

#[tokio::test]
async fn watermarked_only_payload_still_resolves() {
    let app = Router::new().route(
        "/api/",
        get(|| async {
            Json(json!({
                "code": 0,
                "data": { "wmplay": "https://cdn.example/wm.mp4" }
            }))
        }),
    );
    let base = spawn_api_stub(app).await;

    let resolved = resolver_for(&base).resolve("https://t.example/v/1").await.unwrap();
    assert_eq!(resolved.download_url, "https://cdn.example/wm.mp4");
}

#[tokio::test]
async fn upstream_reported_failure_carries_its_message() {
    let app = Router::new().route(
        "/api/",
        get(|| async { Json(json!({ "code": -1, "msg": "video not found" })) }),
    );
    let base = spawn_api_stub(app).await;

    let error = resolver_for(&base)
        .resolve("https://t.example/v/1")
        .await
        .unwrap_err();
    assert!(matches!(
        &error,
        GatewayError::ResolutionFailed { message } if message == "video not found"
    ));
}

#[tokio::test]
async fn upstream_http_error_status_is_surfaced() {
    let app = Router::new().route(
        "/api/",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base = spawn_api_stub(app).await;

    let error = resolver_for(&base)
        .resolve("https://t.example/v/1")
        .await
        .unwrap_err();
    assert!(matches!(error, GatewayError::UpstreamStatus { status: 500 }));
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let app = Router::new().route("/api/", get(|| async { "definitely not json" }));
    let base = spawn_api_stub(app).await;

    let error = resolver_for(&base)
        .resolve("https://t.example/v/1")
        .await
        .unwrap_err();
    assert!(matches!(error, GatewayError::UpstreamMalformed { .. }));
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let app = Router::new().route(
        "/api/",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "code": 0 })).into_response()
        }),
    );
    let base = spawn_api_stub(app).await;

    let config = UpstreamConfig {
        api_base: format!("{base}/api/"),
        resolve_timeout: Duration::from_millis(200),
        ..UpstreamConfig::default()
    };
    let error = MediaResolver::new(&config)
        .resolve("https://t.example/v/1")
        .await
        .unwrap_err();
    assert!(matches!(error, GatewayError::UpstreamTimeout));
}

#[tokio::test]
async fn unreachable_upstream_is_a_bad_gateway() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let error = resolver_for(&format!("http://{addr}"))
        .resolve("https://t.example/v/1")
        .await
        .unwrap_err();
    assert!(matches!(error, GatewayError::UpstreamUnreachable { .. }));
}
