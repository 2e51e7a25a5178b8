//! Live reload transport.
//!
//! [`ReloadHub`] fans reload events out to every connected browser over
//! Server-Sent Events. The reload server also serves the client script and an
//! HTTP API through which build tools report errors for the overlay.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive},
        IntoResponse, Response, Sse,
    },
    routing::get,
    Json, Router,
};
use devserve_inject::{ErrorState, ReloadNotifier};
use rust_embed::RustEmbed;
use serde::Serialize;
use serde_json::Value;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};
use tower_http::cors::{Any, CorsLayer};

/// Route of the reload client script.
pub const CLIENT_SCRIPT_PATH: &str = "/livereload.js";

/// Route of the event stream.
pub const EVENTS_PATH: &str = "/livereload";

/// Route of the error API.
pub const ERROR_API_PATH: &str = "/__devserve/error";

const CHANNEL_CAPACITY: usize = 64;

#[derive(RustEmbed)]
#[folder = "assets/"]
struct ClientAssets;

/// A reload instruction sent to browsers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReloadEvent {
    pub command: &'static str,
    pub path: String,
}

impl ReloadEvent {
    pub fn reload(path: impl Into<String>) -> Self {
        Self {
            command: "reload",
            path: path.into(),
        }
    }
}

/// Broadcasts reload events to connected clients.
#[derive(Debug, Clone)]
pub struct ReloadHub {
    sender: broadcast::Sender<ReloadEvent>,
}

impl Default for ReloadHub {
    fn default() -> Self {
        Self::new()
    }
}

impl ReloadHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReloadEvent> {
        self.sender.subscribe()
    }

    /// Number of connected clients.
    pub fn client_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl ReloadNotifier for ReloadHub {
    fn refresh(&self, path: &str) {
        // No receivers just means no browser is open.
        let clients = self.sender.send(ReloadEvent::reload(path)).unwrap_or(0);
        tracing::debug!(path, clients, "Broadcast reload");
    }
}

#[derive(Clone)]
struct ReloadState {
    hub: ReloadHub,
    errors: Arc<ErrorState>,
}

/// Router of the reload server.
pub fn router(hub: ReloadHub, errors: Arc<ErrorState>) -> Router {
    Router::new()
        .route(CLIENT_SCRIPT_PATH, get(client_script))
        .route(EVENTS_PATH, get(events))
        .route(
            ERROR_API_PATH,
            get(current_error).put(set_error).delete(clear_error),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(ReloadState { hub, errors })
}

async fn client_script() -> Response {
    match ClientAssets::get("livereload.js") {
        Some(asset) => (
            [
                (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
                (header::CACHE_CONTROL, "no-cache"),
            ],
            asset.data.into_owned(),
        )
            .into_response(),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Missing embedded live reload client",
        )
            .into_response(),
    }
}

async fn events(State(state): State<ReloadState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.hub.subscribe();
    tracing::debug!(clients = state.hub.client_count(), "Live reload client connected");

    let stream = BroadcastStream::new(receiver).filter_map(|received| {
        // A lagging client missed events; a full reload covers them all.
        let event = received.unwrap_or_else(|_| ReloadEvent::reload("/"));
        Event::default().event("reload").json_data(&event).ok().map(Ok)
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

async fn current_error(State(state): State<ReloadState>) -> Json<Value> {
    Json(state.errors.current().unwrap_or(Value::Null))
}

async fn set_error(State(state): State<ReloadState>, Json(error): Json<Value>) -> StatusCode {
    tracing::info!("Build error reported");
    state.errors.set_error(Some(error));
    StatusCode::NO_CONTENT
}

async fn clear_error(State(state): State<ReloadState>) -> StatusCode {
    state.errors.clear_error();
    StatusCode::NO_CONTENT
}
