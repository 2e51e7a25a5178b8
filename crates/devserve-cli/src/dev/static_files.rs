//! Static file serving from an ordered list of roots.
//!
//! A request is looked up in every root in turn; the first root holding the
//! file wins. Directories resolve to the configured index file.

use async_stream::try_stream;
use axum::{
    body::Body,
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use futures::Stream;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Size of the chunks file contents are streamed in.
pub const CHUNK_SIZE: usize = 16 * 1024;

/// Ordered-fallback file lookup across content roots.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    roots: Arc<[PathBuf]>,
    index: Arc<str>,
    verbose: bool,
}

/// Outcome of resolving a request path.
#[derive(Debug)]
pub enum Lookup {
    /// The file and the path it was found at
    Found(PathBuf, File),
    /// No root has the file
    NotFound,
    /// The request path is not acceptable (`..`, NUL, bad encoding)
    BadRequest,
    /// A root has the path but it could not be read
    Failed(PathBuf, io::Error),
}

impl StaticFiles {
    pub fn new(roots: Vec<PathBuf>, index: impl Into<String>, verbose: bool) -> Self {
        Self {
            roots: roots.into(),
            index: Arc::from(index.into()),
            verbose,
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Resolve a raw (percent-encoded) request path.
    pub async fn lookup(&self, request_path: &str) -> Lookup {
        let Some(relative) = sanitize(request_path) else {
            return Lookup::BadRequest;
        };

        for root in self.roots.iter() {
            let candidate = root.join(&relative);
            match self.open(&candidate).await {
                Ok(found) => return found,
                Err(err) if is_missing(&err) => continue,
                Err(err) => return Lookup::Failed(candidate, err),
            }
        }

        Lookup::NotFound
    }

    async fn open(&self, candidate: &Path) -> io::Result<Lookup> {
        let metadata = tokio::fs::metadata(candidate).await?;
        let path = if metadata.is_dir() {
            candidate.join(&*self.index)
        } else {
            candidate.to_path_buf()
        };
        let file = File::open(&path).await?;
        if file.metadata().await?.is_dir() {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        Ok(Lookup::Found(path, file))
    }

    fn log(&self, request_path: &str, target: &str) {
        if self.verbose {
            tracing::info!("Serving {} -> {}", request_path, target);
        } else {
            tracing::debug!("Serving {} -> {}", request_path, target);
        }
    }
}

fn is_missing(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

/// Decode `request_path` into a path relative to a root.
///
/// Returns `None` for paths escaping the root, NUL bytes or invalid UTF-8.
fn sanitize(request_path: &str) -> Option<PathBuf> {
    let decoded = urlencoding::decode(request_path).ok()?;
    if decoded.contains('\0') {
        return None;
    }

    let mut relative = PathBuf::new();
    for segment in decoded.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => return None,
            // Drive prefixes on Windows
            s if s.contains(':') => return None,
            s => relative.push(s),
        }
    }
    Some(relative)
}

/// Content type for a file, by extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "md" => "text/markdown; charset=utf-8",
        "xml" => "application/xml",
        "wasm" => "application/wasm",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "pdf" => "application/pdf",
        "mp4" => "video/mp4",
        _ => "application/octet-stream",
    }
}

fn read_chunks(mut file: File) -> impl Stream<Item = io::Result<Bytes>> {
    try_stream! {
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            let read = file.read(&mut buf).await?;
            if read == 0 {
                break;
            }
            yield Bytes::copy_from_slice(&buf[..read]);
        }
    }
}

/// Fallback handler serving files from the configured roots.
pub async fn serve_static(
    State(files): State<StaticFiles>,
    method: Method,
    uri: Uri,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let request_path = uri.path();
    match files.lookup(request_path).await {
        Lookup::Found(path, file) => {
            files.log(request_path, &path.display().to_string());
            let content_type = content_type_for(&path);
            let length = match file.metadata().await {
                Ok(metadata) => metadata.len(),
                Err(err) => return failed(&path, err),
            };

            let body = if method == Method::HEAD {
                Body::empty()
            } else {
                Body::from_stream(read_chunks(file))
            };

            (
                [
                    (header::CONTENT_TYPE, content_type.to_string()),
                    (header::CONTENT_LENGTH, length.to_string()),
                    (header::CACHE_CONTROL, "no-cache".to_string()),
                ],
                body,
            )
                .into_response()
        }
        Lookup::NotFound => {
            files.log(request_path, "404 - Not Found");
            (StatusCode::NOT_FOUND, format!("Not Found: {}", request_path)).into_response()
        }
        Lookup::BadRequest => {
            tracing::warn!("Rejected request path {}", request_path);
            (StatusCode::BAD_REQUEST, "Bad Request").into_response()
        }
        Lookup::Failed(path, err) => failed(&path, err),
    }
}

fn failed(path: &Path, err: io::Error) -> Response {
    tracing::error!("Failed to serve {}: {}", path.display(), err);
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}
