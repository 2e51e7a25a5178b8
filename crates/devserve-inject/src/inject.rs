//! Splicing a snippet in front of the closing `</body>` tag.

use crate::body::{ResponseBody, ResponseContext};
use crate::error::{InjectError, Result};
use crate::transform::transform_stream;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

static BODY_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<\s*/\s*body\s*>").expect("body close pattern is valid"));

/// Insert `snippet` right before the first closing body tag of `html`.
///
/// The matched tag is normalized to `</body>`. Without a closing tag the
/// input is returned unchanged.
pub fn insert_before_body_close(html: &str, snippet: &str) -> String {
    let replacement = format!("{}</body>", snippet);
    BODY_CLOSE
        .replace(html, NoExpand(&replacement))
        .into_owned()
}

/// Rewrite `ctx.body` so it carries `snippet`.
///
/// Buffered bytes are widened to text; streams are wrapped so the rewrite
/// happens once the whole body has been seen. Callers are expected to have
/// filtered on content type already.
///
/// # Errors
///
/// Returns [`InjectError::UnexpectedBodyType`] for a body the producer could
/// not hand over as text, bytes or a stream.
pub fn inject_snippet(ctx: &mut ResponseContext, snippet: &str) -> Result<()> {
    match std::mem::take(&mut ctx.body) {
        ResponseBody::Empty => {}
        ResponseBody::Binary(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            ctx.body = ResponseBody::Text(insert_before_body_close(&text, snippet));
        }
        ResponseBody::Text(text) => {
            ctx.body = ResponseBody::Text(insert_before_body_close(&text, snippet));
        }
        ResponseBody::Stream(source) => {
            let snippet = snippet.to_string();
            ctx.body = ResponseBody::Stream(transform_stream(source, move |text| {
                insert_before_body_close(&text, &snippet)
            }));
        }
        ResponseBody::Unsupported(what) => {
            return Err(InjectError::UnexpectedBodyType(what));
        }
    }
    Ok(())
}
