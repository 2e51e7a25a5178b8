//! Integration tests for the development server.
//!
//! Tests drive the web router in-process and verify static file fallback,
//! live reload injection, and the error overlay.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use devserve_cli::config::{DevServeConfig, LiveReloadConfig};
use devserve_cli::dev::DevServer;
use serde_json::json;
use std::fs;
use tempfile::TempDir;
use tower::ServiceExt;

const SCRIPT: &str = "<script type='application/javascript' src='http://127.0.0.1:35729/livereload.js?snipver=1'></script>";

struct Site {
    first: TempDir,
    second: TempDir,
}

fn site() -> Site {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    fs::write(
        first.path().join("index.html"),
        "<html><head></head><body><h1>Home</h1></body></html>",
    )
    .unwrap();
    fs::write(second.path().join("index.html"), "<body>shadowed</body>").unwrap();
    fs::write(second.path().join("app.js"), "console.log('app');").unwrap();
    fs::write(second.path().join("data.json"), r#"{"ok":true}"#).unwrap();
    fs::write(second.path().join("fragment.html"), "<p>no body tag</p>").unwrap();

    Site { first, second }
}

fn server(site: &Site, livereload: bool) -> DevServer {
    let config = DevServeConfig {
        roots: vec![site.first.path().to_path_buf(), site.second.path().to_path_buf()],
        livereload: livereload
            .then(|| LiveReloadConfig::new(vec![site.first.path().to_path_buf()])),
        ..DevServeConfig::default()
    };
    DevServer::new(config).unwrap()
}

async fn get(server: &DevServer, uri: &str) -> Response {
    server
        .router()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_first_root_wins() {
    let site = site();
    let server = server(&site, false);

    let response = get(&server, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    assert!(text(response).await.contains("<h1>Home</h1>"));
}

#[tokio::test]
async fn test_falls_back_to_later_roots() {
    let site = site();
    let server = server(&site, false);

    let response = get(&server, "/app.js").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text(response).await, "console.log('app');");
}

#[tokio::test]
async fn test_missing_file_is_404() {
    let site = site();
    let server = server(&site, true);

    let response = get(&server, "/missing.png").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_traversal_is_rejected() {
    let site = site();
    let server = server(&site, false);

    let response = get(&server, "/%2e%2e/etc/passwd").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_snippet_injected_into_html() {
    let site = site();
    let server = server(&site, true);

    let response = get(&server, "/index.html").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::CONTENT_LENGTH).is_none());

    let html = text(response).await;
    let expected = format!("<h1>Home</h1>\n{}\n</body></html>", SCRIPT);
    assert!(html.ends_with(&expected), "unexpected body: {}", html);
    assert_eq!(html.matches(SCRIPT).count(), 1);
}

#[tokio::test]
async fn test_snippet_uses_configured_protocol() {
    let site = site();
    let server = DevServer::new(DevServeConfig {
        roots: vec![site.first.path().to_path_buf()],
        livereload: Some(LiveReloadConfig {
            protocol: "https".to_string(),
            ..LiveReloadConfig::new(vec![site.first.path().to_path_buf()])
        }),
        ..DevServeConfig::default()
    })
    .unwrap();

    let html = text(get(&server, "/").await).await;
    assert!(html.contains("src='https://127.0.0.1:35729/livereload.js?snipver=1'"));
}

#[tokio::test]
async fn test_html_without_body_tag_is_unchanged() {
    let site = site();
    let server = server(&site, true);

    let response = get(&server, "/fragment.html").await;
    assert_eq!(text(response).await, "<p>no body tag</p>");
}

#[tokio::test]
async fn test_non_html_untouched() {
    let site = site();
    let server = server(&site, true);

    let response = get(&server, "/data.json").await;
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(response.headers()[header::CONTENT_LENGTH], "11");
    assert_eq!(text(response).await, r#"{"ok":true}"#);
}

#[tokio::test]
async fn test_no_injection_without_livereload() {
    let site = site();
    let server = server(&site, false);

    let response = get(&server, "/").await;
    assert!(!text(response).await.contains("livereload.js"));
}

#[tokio::test]
async fn test_error_overlay_shown_until_cleared() {
    let site = site();
    let server = server(&site, true);

    server.set_error(Some(json!({
        "message": "Unexpected token <",
        "id": "src/main.js",
        "line": 3,
        "column": 5,
        "frame": "1 | let a = <"
    })));

    let html = text(get(&server, "/").await).await;
    assert!(html.contains("devserve-error-overlay"));
    assert!(html.contains("src/main.js (3:5)"));
    assert!(html.contains("Unexpected token &lt;"));
    assert!(html.contains(SCRIPT));

    server.clear_error();
    let html = text(get(&server, "/").await).await;
    assert!(!html.contains("devserve-error-overlay"));
    assert!(html.contains(SCRIPT));
}

#[tokio::test]
async fn test_head_request_has_no_body() {
    let site = site();
    let server = server(&site, true);

    let response = server
        .router()
        .oneshot(
            Request::builder()
                .method("HEAD")
                .uri("/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text(response).await.is_empty());
}
