//! The response shape the injection pipeline operates on.
//!
//! Frameworks hand responses over in different forms: a string rendered by a
//! handler, a byte buffer, or a live stream (e.g. a file being read). The
//! adapter between the framework and this crate classifies the body once into
//! [`ResponseBody`] and the rest of the pipeline matches on it.

use bytes::Bytes;
use futures::stream::BoxStream;
use std::fmt;

/// Boxed error type carried by body streams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A live response body.
pub type BodyStream = BoxStream<'static, Result<Bytes, BoxError>>;

/// The body of an in-flight response.
#[derive(Default)]
pub enum ResponseBody {
    /// No body at all
    #[default]
    Empty,
    /// Already-rendered text
    Text(String),
    /// Already-buffered bytes
    Binary(Bytes),
    /// A stream that has not been consumed yet
    Stream(BodyStream),
    /// A body the producer could not hand over as text, bytes or a stream.
    /// The string describes what it was.
    Unsupported(String),
}

impl ResponseBody {
    /// Whether there is nothing to inject into.
    pub fn is_empty(&self) -> bool {
        match self {
            ResponseBody::Empty => true,
            ResponseBody::Text(text) => text.is_empty(),
            ResponseBody::Binary(bytes) => bytes.is_empty(),
            ResponseBody::Stream(_) | ResponseBody::Unsupported(_) => false,
        }
    }

    /// Short name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ResponseBody::Empty => "empty",
            ResponseBody::Text(_) => "text",
            ResponseBody::Binary(_) => "binary",
            ResponseBody::Stream(_) => "stream",
            ResponseBody::Unsupported(_) => "unsupported",
        }
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Empty => f.write_str("Empty"),
            ResponseBody::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            ResponseBody::Binary(bytes) => f.debug_tuple("Binary").field(&bytes.len()).finish(),
            ResponseBody::Stream(_) => f.write_str("Stream(..)"),
            ResponseBody::Unsupported(what) => f.debug_tuple("Unsupported").field(what).finish(),
        }
    }
}

impl From<String> for ResponseBody {
    fn from(text: String) -> Self {
        ResponseBody::Text(text)
    }
}

impl From<&str> for ResponseBody {
    fn from(text: &str) -> Self {
        ResponseBody::Text(text.to_string())
    }
}

impl From<Bytes> for ResponseBody {
    fn from(bytes: Bytes) -> Self {
        ResponseBody::Binary(bytes)
    }
}

impl From<Vec<u8>> for ResponseBody {
    fn from(bytes: Vec<u8>) -> Self {
        ResponseBody::Binary(Bytes::from(bytes))
    }
}

/// Per-request response state seen by the injection middleware.
///
/// Owned by the framework adapter. The pipeline reads every field but only
/// replaces `body`.
#[derive(Debug)]
pub struct ResponseContext {
    /// Response body
    pub body: ResponseBody,
    /// Declared `Content-Type`, if any
    pub content_type: Option<String>,
    /// Whether headers were already flushed to the client
    pub headers_sent: bool,
    /// Whether the client connection can still be written to
    pub writable: bool,
    /// HTTP status code
    pub status: u16,
}

impl ResponseContext {
    /// A writable 200 response with no body and no content type.
    pub fn new() -> Self {
        Self {
            body: ResponseBody::Empty,
            content_type: None,
            headers_sent: false,
            writable: true,
            status: 200,
        }
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<ResponseBody>) -> Self {
        self.body = body.into();
        self
    }

    /// Set the declared content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Whether the declared content type (if any) allows HTML injection.
    ///
    /// A missing content type is given the benefit of the doubt.
    pub fn accepts_html(&self) -> bool {
        self.content_type
            .as_deref()
            .map_or(true, |ct| ct.to_ascii_lowercase().contains("html"))
    }
}

impl Default for ResponseContext {
    fn default() -> Self {
        Self::new()
    }
}
