//! Integration tests for the preview server

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use sitesmith_preview::{
    create_router,
    server::{HealthCheckResponse, HEALTH_PATH},
    PreviewConfig, PreviewError, PreviewServer,
};
use std::fs;
use tempfile::TempDir;
use tower::ServiceExt; // for oneshot

/// Helper to create an output directory with a generated site
fn create_site_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("index.html"),
        "<!DOCTYPE html><html><body><h1>Preview</h1></body></html>",
    )
    .unwrap();
    fs::write(dir.path().join("styles.css"), "h1 { color: teal; }").unwrap();
    fs::write(dir.path().join("script.js"), "console.log('hi');").unwrap();
    dir
}

async fn get(dir: &TempDir, uri: &str) -> axum::response::Response {
    let app = create_router(dir.path());
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

#[tokio::test]
async fn test_root_serves_index() {
    let dir = create_site_dir();
    let response = get(&dir, "/").await;

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&body).contains("<h1>Preview</h1>"));
}

#[tokio::test]
async fn test_stylesheet_content_type() {
    let dir = create_site_dir();
    let response = get(&dir, "/styles.css").await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/css"));
}

#[tokio::test]
async fn test_missing_file_is_404() {
    let dir = create_site_dir();
    let response = get(&dir, "/missing.html").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_path_traversal_rejected() {
    let dir = create_site_dir();
    let response = get(&dir, "/../secret.txt").await;
    assert_ne!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let dir = create_site_dir();
    let response = get(&dir, HEALTH_PATH).await;

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: HealthCheckResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(health.status, "healthy");
    assert_eq!(health.root, dir.path().display().to_string());
}

#[tokio::test]
async fn test_server_lifecycle() {
    let dir = create_site_dir();
    let config = PreviewConfig {
        start_port: 47_300,
        max_port_attempts: 50,
        ..PreviewConfig::for_dir(dir.path())
    };

    let server = PreviewServer::start(&config).await.unwrap();
    let port = server.port();
    assert!((47_300..47_350).contains(&port));
    assert_eq!(server.url(), format!("http://localhost:{}", port));
    assert!(server.is_running());

    let body = reqwest::get(format!("http://127.0.0.1:{}/", port))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("<h1>Preview</h1>"));

    server.stop().await;
}

#[tokio::test]
async fn test_second_server_takes_next_port() {
    let dir = create_site_dir();
    let config = PreviewConfig {
        start_port: 47_400,
        max_port_attempts: 50,
        ..PreviewConfig::for_dir(dir.path())
    };

    let first = PreviewServer::start(&config).await.unwrap();
    let second = PreviewServer::start(&config).await.unwrap();
    assert!(second.port() > first.port());

    first.stop().await;
    second.stop().await;
}

#[tokio::test]
async fn test_no_free_port() {
    let dir = create_site_dir();
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port();

    let config = PreviewConfig {
        start_port: port,
        max_port_attempts: 1,
        ..PreviewConfig::for_dir(dir.path())
    };

    let result = PreviewServer::start(&config).await;
    assert!(matches!(result, Err(PreviewError::NoFreePort { .. })));
}
