//! Per-request orchestration of snippet injection.

use crate::body::ResponseContext;
use crate::build_error::normalize;
use crate::error::{InjectError, Result};
use crate::inject::inject_snippet;
use crate::state::ErrorState;
use crate::template::expand;
use futures::future::BoxFuture;
use std::path::PathBuf;
use std::sync::Arc;

/// Default port of the reload transport.
pub const DEFAULT_LIVERELOAD_PORT: u16 = 35729;

/// Default host of the reload transport.
pub const DEFAULT_LIVERELOAD_HOST: &str = "127.0.0.1";

/// Default protocol of the reload transport.
pub const DEFAULT_LIVERELOAD_PROTOCOL: &str = "http";

/// Error overlay template used when no `error_file` is configured.
pub const DEFAULT_ERROR_TEMPLATE: &str = include_str!("../assets/error.html");

/// Construction-time options of [`LiveReloadInjector`].
#[derive(Debug, Clone, Default)]
pub struct InjectorOptions {
    /// Explicit URL of the reload client script, overriding host/port/protocol
    pub src: Option<String>,
    /// Reload transport port (default 35729)
    pub port: Option<u16>,
    /// Reload transport host (default 127.0.0.1)
    pub hostname: Option<String>,
    /// Reload transport protocol (default http)
    pub protocol: Option<String>,
    /// Error overlay template; the bundled one is used when unset
    pub error_file: Option<PathBuf>,
    /// Source of the current build error. Without it no overlay is rendered.
    pub error_provider: Option<Arc<ErrorState>>,
}

/// URL of the reload client script for `options`.
pub fn livereload_src(options: &InjectorOptions) -> String {
    if let Some(src) = &options.src {
        return src.clone();
    }
    format!(
        "{}://{}:{}/livereload.js?snipver=1",
        options.protocol.as_deref().unwrap_or(DEFAULT_LIVERELOAD_PROTOCOL),
        options.hostname.as_deref().unwrap_or(DEFAULT_LIVERELOAD_HOST),
        options.port.unwrap_or(DEFAULT_LIVERELOAD_PORT)
    )
}

/// Injects the reload client (and the error overlay) into HTML responses.
#[derive(Debug)]
pub struct LiveReloadInjector {
    script_tag: String,
    error_provider: Option<Arc<ErrorState>>,
    error_template: Option<String>,
}

impl LiveReloadInjector {
    /// Build an injector.
    ///
    /// When an error provider is configured the overlay template is loaded
    /// here, once.
    ///
    /// # Errors
    ///
    /// Returns [`InjectError::TemplateLoad`] if `error_file` cannot be read.
    pub fn new(options: InjectorOptions) -> Result<Self> {
        let script_tag = format!(
            "\n<script type='application/javascript' src='{}'></script>\n",
            livereload_src(&options)
        );

        let error_template = match (&options.error_provider, &options.error_file) {
            (None, _) => None,
            (Some(_), None) => Some(DEFAULT_ERROR_TEMPLATE.to_string()),
            (Some(_), Some(path)) => Some(std::fs::read_to_string(path).map_err(|source| {
                InjectError::TemplateLoad {
                    path: path.clone(),
                    source,
                }
            })?),
        };

        Ok(Self {
            script_tag,
            error_provider: options.error_provider,
            error_template,
        })
    }

    /// The reload client `<script>` tag.
    pub fn script_tag(&self) -> &str {
        &self.script_tag
    }

    /// Compose the snippet for the current error state.
    pub fn snippet(&self) -> String {
        let overlay = self
            .error_template
            .as_deref()
            .zip(self.error_provider.as_ref().and_then(|p| p.current()));

        match overlay {
            Some((template, raw)) => {
                let error = normalize(&raw);
                tracing::debug!(location = %error.location, "Rendering error overlay");
                let mut snippet = expand(template, &error.to_value());
                snippet.push_str(&self.script_tag);
                snippet
            }
            None => self.script_tag.clone(),
        }
    }

    /// Inject into a response that the rest of the pipeline has produced.
    ///
    /// Skips silently when headers were already sent, the client is gone,
    /// there is no body, or the declared content type is not HTML.
    ///
    /// # Errors
    ///
    /// Propagates [`InjectError::UnexpectedBodyType`] from the injector.
    pub fn apply(&self, ctx: &mut ResponseContext) -> Result<()> {
        if ctx.headers_sent || !ctx.writable || ctx.body.is_empty() || !ctx.accepts_html() {
            tracing::trace!(
                status = ctx.status,
                body = ctx.body.kind(),
                content_type = ?ctx.content_type,
                "Skipping snippet injection"
            );
            return Ok(());
        }

        let snippet = self.snippet();
        tracing::trace!(body = ctx.body.kind(), "Injecting live reload snippet");
        inject_snippet(ctx, &snippet)
    }

    /// Run `next` to produce the response, then inject into it.
    ///
    /// ```
    /// use devserve_inject::{InjectorOptions, LiveReloadInjector, ResponseContext};
    ///
    /// # futures::executor::block_on(async {
    /// let injector = LiveReloadInjector::new(InjectorOptions::default()).unwrap();
    /// let mut ctx = ResponseContext::new();
    /// injector
    ///     .handle(&mut ctx, |ctx| {
    ///         Box::pin(async move {
    ///             ctx.body = "<body></body>".into();
    ///         })
    ///     })
    ///     .await
    ///     .unwrap();
    /// # });
    /// ```
    pub async fn handle<N>(&self, ctx: &mut ResponseContext, next: N) -> Result<()>
    where
        N: for<'a> FnOnce(&'a mut ResponseContext) -> BoxFuture<'a, ()>,
    {
        next(&mut *ctx).await;
        self.apply(ctx)
    }
}
