//! Live-reload snippet and build-error overlay injection.
//!
//! This crate rewrites outgoing HTML responses of a development server so they
//! load a live-reload client, and, while a build error is reported, show an
//! error overlay rendered from a template.
//!
//! # Architecture
//!
//! - [`template`] - `${dotted.path}` expansion with HTML escaping
//! - [`build_error`] - normalization of heterogeneous build error records
//! - [`transform`] - whole-body rewriting of streamed responses
//! - [`inject`] - splicing a snippet before `</body>` for every body shape
//! - [`state`] - the process-wide error state and the reload notifier seam
//! - [`middleware`] - per-request orchestration ([`LiveReloadInjector`])
//!
//! The crate is framework-agnostic: an adapter classifies the framework's
//! response into a [`ResponseContext`], calls [`LiveReloadInjector::apply`],
//! and turns the context back into a response.
//!
//! # Example
//!
//! ```
//! use devserve_inject::{ErrorState, InjectorOptions, LiveReloadInjector, NoopNotifier, ResponseBody, ResponseContext};
//! use std::sync::Arc;
//!
//! let errors = Arc::new(ErrorState::new(Arc::new(NoopNotifier)));
//! let injector = LiveReloadInjector::new(InjectorOptions {
//!     error_provider: Some(errors.clone()),
//!     ..Default::default()
//! })?;
//!
//! let mut ctx = ResponseContext::new()
//!     .with_body("<html><body>hello</body></html>")
//!     .with_content_type("text/html");
//! injector.apply(&mut ctx)?;
//!
//! let ResponseBody::Text(html) = &ctx.body else { unreachable!() };
//! assert!(html.contains("livereload.js?snipver=1"));
//! # Ok::<(), devserve_inject::InjectError>(())
//! ```

pub mod body;
pub mod build_error;
pub mod error;
pub mod inject;
pub mod middleware;
pub mod state;
pub mod template;
pub mod transform;

pub use body::{BodyStream, BoxError, ResponseBody, ResponseContext};
pub use build_error::{normalize, NormalizedError};
pub use error::{InjectError, Result};
pub use inject::inject_snippet;
pub use middleware::{livereload_src, InjectorOptions, LiveReloadInjector};
pub use state::{ErrorState, NoopNotifier, ReloadNotifier};
pub use template::expand;
pub use transform::transform_stream;
