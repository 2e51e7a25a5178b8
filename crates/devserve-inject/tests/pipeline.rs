//! End-to-end tests of the injection pipeline: error state, overlay
//! rendering and body rewriting together.

use bytes::Bytes;
use devserve_inject::{
    BodyStream, BoxError, ErrorState, InjectorOptions, LiveReloadInjector, ReloadNotifier,
    ResponseBody, ResponseContext,
};
use futures::{stream, StreamExt};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;

#[derive(Default)]
struct Refreshes(Mutex<Vec<String>>);

impl ReloadNotifier for Refreshes {
    fn refresh(&self, path: &str) {
        self.0.lock().push(path.to_string());
    }
}

fn chunked(text: &'static str, size: usize) -> BodyStream {
    let chunks: Vec<Result<Bytes, BoxError>> = text
        .as_bytes()
        .chunks(size)
        .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
        .collect();
    stream::iter(chunks).boxed()
}

async fn collect(body: ResponseBody) -> String {
    let ResponseBody::Stream(mut stream) = body else {
        panic!("expected a stream body");
    };
    let mut out = Vec::new();
    while let Some(chunk) = stream.next().await {
        out.extend_from_slice(&chunk.unwrap());
    }
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn test_overlay_follows_error_state() {
    let refreshes = Arc::new(Refreshes::default());
    let errors = Arc::new(ErrorState::new(refreshes.clone()));
    let injector = LiveReloadInjector::new(InjectorOptions {
        port: Some(35800),
        error_provider: Some(errors.clone()),
        ..Default::default()
    })
    .unwrap();

    errors.set_error(Some(json!({
        "message": "Unexpected <token>",
        "id": "src/app.js",
        "log": "plugin output",
        "loc": { "line": 12, "column": 4 },
    })));

    let mut ctx = ResponseContext::new()
        .with_body(ResponseBody::Stream(chunked("<html><body>app</body></html>", 3)))
        .with_content_type("text/html");
    injector.apply(&mut ctx).unwrap();
    let html = collect(ctx.body).await;

    assert!(html.contains("src/app.js (12:4)"));
    assert!(html.contains("Unexpected &lt;token&gt;"));
    assert!(html.contains("http://127.0.0.1:35800/livereload.js?snipver=1"));
    assert!(html.ends_with("</script>\n</body></html>"));

    errors.clear_error();
    let mut ctx = ResponseContext::new()
        .with_body("<body>app</body>")
        .with_content_type("text/html");
    injector.apply(&mut ctx).unwrap();
    let ResponseBody::Text(html) = ctx.body else {
        panic!("expected a text body");
    };
    assert!(!html.contains("devserve-error-overlay"));

    assert_eq!(*refreshes.0.lock(), vec!["/".to_string(), "/".to_string()]);
}

#[tokio::test]
async fn test_handle_runs_next_first() {
    let injector = LiveReloadInjector::new(InjectorOptions {
        src: Some("/lr.js".to_string()),
        ..Default::default()
    })
    .unwrap();

    let mut ctx = ResponseContext::new();
    injector
        .handle(&mut ctx, |ctx| {
            Box::pin(async move {
                ctx.content_type = Some("application/json".to_string());
                ctx.body = r#"{"html":"</body>"}"#.into();
            })
        })
        .await
        .unwrap();

    let ResponseBody::Text(json) = ctx.body else {
        panic!("expected a text body");
    };
    assert_eq!(json, r#"{"html":"</body>"}"#);
}
