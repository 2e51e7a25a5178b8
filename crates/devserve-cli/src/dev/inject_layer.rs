//! axum adapter for [`LiveReloadInjector`].
//!
//! The inner service runs first; its response is classified into a
//! [`ResponseContext`], handed to the injector, and rebuilt. Bodies the
//! injector rewrites lose their `Content-Length` so hyper recomputes framing.

use axum::{
    body::{Body, HttpBody},
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use devserve_inject::{BoxError, LiveReloadInjector, ResponseBody, ResponseContext};
use futures::{StreamExt, TryStreamExt};
use std::sync::Arc;

/// Middleware for `axum::middleware::from_fn_with_state`.
pub async fn inject_livereload(
    State(injector): State<Arc<LiveReloadInjector>>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    let (mut parts, body) = response.into_parts();

    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    // Encoded bodies are opaque to the injector; the original is kept so
    // it can be passed through when no injection applies.
    let mut held = None;
    let body = match content_encoding(&parts.headers) {
        Some(encoding) => {
            held = Some(body);
            ResponseBody::Unsupported(format!("content-encoded body ({})", encoding))
        }
        None => match classify(body).await {
            Ok(body) => body,
            Err(err) => {
                tracing::error!("Failed to read response body: {}", err);
                return internal_error();
            }
        },
    };

    let mut ctx = ResponseContext {
        body,
        content_type,
        headers_sent: false,
        writable: true,
        status: parts.status.as_u16(),
    };
    let injects = ctx.accepts_html() && !ctx.body.is_empty();

    if let Err(err) = injector.apply(&mut ctx) {
        tracing::error!(status = ctx.status, "Live reload injection failed: {}", err);
        return internal_error();
    }

    if injects {
        parts.headers.remove(header::CONTENT_LENGTH);
    }
    if let Ok(status) = StatusCode::from_u16(ctx.status) {
        parts.status = status;
    }

    Response::from_parts(parts, into_body(ctx.body, held))
}

fn content_encoding(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::CONTENT_ENCODING)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).trim().to_string())
        .filter(|encoding| !encoding.is_empty() && !encoding.eq_ignore_ascii_case("identity"))
}

/// Classify a body by what it can tell about its size.
///
/// Known-empty bodies are `Empty`, bodies of exact known size are buffered,
/// everything else is forwarded as a stream.
pub async fn classify(body: Body) -> Result<ResponseBody, axum::Error> {
    let hint = body.size_hint();
    if body.is_end_stream() || hint.exact() == Some(0) {
        return Ok(ResponseBody::Empty);
    }

    if hint.exact().is_some() {
        let bytes = axum::body::to_bytes(body, usize::MAX).await?;
        return Ok(ResponseBody::Binary(bytes));
    }

    let stream = body
        .into_data_stream()
        .map_err(|err| Box::new(err) as BoxError)
        .boxed();
    Ok(ResponseBody::Stream(stream))
}

fn into_body(body: ResponseBody, held: Option<Body>) -> Body {
    match body {
        ResponseBody::Empty => Body::empty(),
        ResponseBody::Text(text) => Body::from(text),
        ResponseBody::Binary(bytes) => Body::from(bytes),
        ResponseBody::Stream(stream) => Body::from_stream(stream),
        ResponseBody::Unsupported(_) => held.unwrap_or_default(),
    }
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}
