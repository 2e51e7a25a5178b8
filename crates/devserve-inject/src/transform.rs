//! Whole-body rewriting of streamed responses.
//!
//! The `</body>` tag can straddle any chunk boundary, so the wrapper buffers
//! the complete source before rewriting and emits the result as a single
//! chunk. Nothing is emitted mid-stream.

use crate::body::BodyStream;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;

/// Wrap `source` so its full text is passed through `rewrite` once it ends.
///
/// - every chunk is buffered; none is dropped
/// - on completion the buffer is decoded as UTF-8 (invalid sequences become
///   U+FFFD), rewritten, and yielded as the only chunk
/// - a source error is yielded as the only item; no text is emitted
///
/// Dropping the returned stream drops the buffer and the source with it.
pub fn transform_stream<F>(source: BodyStream, rewrite: F) -> BodyStream
where
    F: FnOnce(String) -> String + Send + 'static,
{
    async_stream::try_stream! {
        let mut source = source;
        let mut buffer = BytesMut::new();

        while let Some(chunk) = source.next().await {
            buffer.extend_from_slice(&chunk?);
        }

        tracing::trace!(bytes = buffer.len(), "Stream ended, rewriting buffered body");
        let rewritten = rewrite(decode_utf8(buffer.freeze()));
        yield Bytes::from(rewritten);
    }
    .boxed()
}

fn decode_utf8(bytes: Bytes) -> String {
    match String::from_utf8(bytes.to_vec()) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}
