//! Error types for the injection pipeline.
//!
//! Only two things can go wrong inside the core: an upstream producer hands
//! over a response body we cannot rewrite, or the error overlay template
//! cannot be loaded at startup. Everything else (no `</body>` tag, non-HTML
//! responses, malformed error records) degrades silently.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the injection pipeline.
#[derive(Debug, Error)]
pub enum InjectError {
    /// The response body is neither text, bytes nor a stream.
    ///
    /// This is a contract violation by whatever produced the response. It is
    /// meant to reach the hosting framework's error handler (a 500 response)
    /// rather than being swallowed.
    #[error("Unexpected body type: {0}")]
    UnexpectedBodyType(String),

    /// The error overlay template could not be read.
    #[error("Failed to load error overlay template {}: {source}\n\nHint: Check the errorPage path or remove it to use the bundled template", .path.display())]
    TemplateLoad {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using `InjectError` as the default error type.
pub type Result<T, E = InjectError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_body_type_message() {
        let err = InjectError::UnexpectedBodyType("gzip-encoded body".to_string());
        assert_eq!(err.to_string(), "Unexpected body type: gzip-encoded body");
    }

    #[test]
    fn test_template_load_message() {
        let err = InjectError::TemplateLoad {
            path: PathBuf::from("overlay/error.html"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let msg = err.to_string();
        assert!(msg.contains("overlay/error.html"));
        assert!(msg.contains("Hint:"));
    }
}
