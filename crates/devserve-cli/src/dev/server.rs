//! The development server: static files, live reload and the error overlay.

use crate::config::DevServeConfig;
use crate::dev::inject_layer::inject_livereload;
use crate::dev::reload::{self, ReloadHub};
use crate::dev::static_files::{serve_static, StaticFiles};
use crate::dev::watcher::{FileChange, FileWatcher};
use crate::error::{CliError, Result, ResultExt};
use crate::ui;
use axum::{middleware, Router};
use devserve_inject::{ErrorState, InjectorOptions, LiveReloadInjector, ReloadNotifier};
use serde_json::Value;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

/// How many ports above the configured one are tried when it is busy.
pub const PORT_ATTEMPTS: u16 = 10;

/// Development server.
///
/// Owns the configuration, the shared error state, the reload hub and the
/// injector. Build errors reported through [`DevServer::set_error`] show up as
/// an overlay on every HTML page until cleared.
pub struct DevServer {
    config: DevServeConfig,
    roots: Vec<PathBuf>,
    url: String,
    errors: Arc<ErrorState>,
    hub: ReloadHub,
    injector: Option<Arc<LiveReloadInjector>>,
}

impl DevServer {
    /// Create a server for `config`.
    ///
    /// # Errors
    ///
    /// Returns error if a root does not exist or the error page cannot be read
    pub fn new(config: DevServeConfig) -> Result<Self> {
        let roots = config
            .roots
            .iter()
            .map(|root| root.canonicalize().with_path(root))
            .collect::<Result<Vec<_>>>()?;

        let hub = ReloadHub::new();
        let errors = Arc::new(ErrorState::new(Arc::new(hub.clone())));

        let injector = match &config.livereload {
            Some(livereload) => Some(Arc::new(LiveReloadInjector::new(InjectorOptions {
                src: livereload.src.clone(),
                port: Some(livereload.port),
                hostname: Some(config.host.clone()),
                protocol: Some(livereload.protocol.clone()),
                error_file: livereload.error_page.clone(),
                error_provider: Some(errors.clone()),
            })?)),
            None => None,
        };

        let url = server_url(&config.host, config.port);

        Ok(Self {
            config,
            roots,
            url,
            errors,
            hub,
            injector,
        })
    }

    pub fn config(&self) -> &DevServeConfig {
        &self.config
    }

    /// Content roots as absolute paths.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Base URL of the web server. Updated by [`DevServer::start`] when the
    /// configured port was busy.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn livereload_enabled(&self) -> bool {
        self.injector.is_some()
    }

    pub fn error_state(&self) -> &Arc<ErrorState> {
        &self.errors
    }

    pub fn hub(&self) -> &ReloadHub {
        &self.hub
    }

    /// Build the web application router.
    pub fn router(&self) -> Router {
        let files = StaticFiles::new(
            self.roots.clone(),
            self.config.index.clone(),
            self.config.verbose,
        );

        let mut router = Router::new().fallback(serve_static).with_state(files);

        if let Some(injector) = &self.injector {
            router = router.layer(middleware::from_fn_with_state(
                injector.clone(),
                inject_livereload,
            ));
        }

        router.layer(TraceLayer::new_for_http())
    }

    /// Router of the live reload server.
    pub fn reload_router(&self) -> Router {
        reload::router(self.hub.clone(), self.errors.clone())
    }

    /// Bind the listeners and start serving in the background.
    ///
    /// # Errors
    ///
    /// Returns error if no port could be bound or a watch path is missing
    pub async fn start(&mut self) -> Result<RunningServer> {
        let shutdown = Arc::new(watch::channel(false).0);
        let mut tasks = Vec::new();

        let listener = bind_with_fallback(&self.config.host, self.config.port).await?;
        let addr = listener.local_addr()?;
        self.url = server_url(&self.config.host, addr.port());
        tasks.push(spawn_server("web", listener, self.router(), &shutdown));

        let mut watcher = None;
        if let Some(livereload) = &self.config.livereload {
            let addr = format!("{}:{}", self.config.host, livereload.port);
            // Exact port: the injected script URL points at it.
            let listener = TcpListener::bind(&addr)
                .await
                .map_err(|e| {
                    CliError::Server(format!("Failed to bind live reload server to {}: {}", addr, e))
                })
                .with_hint("Pick another port with --livereload-port or livereload.port")?;
            tasks.push(spawn_server("livereload", listener, self.reload_router(), &shutdown));

            let (file_watcher, changes) = FileWatcher::new(
                livereload.watch.clone(),
                livereload.exclusions.clone(),
                livereload.debounce_ms,
            )
            .with_hint("Every --watch path (livereload.watch) must exist")?;
            for root in file_watcher.roots() {
                tracing::info!("Watching {}", root.display());
            }
            tasks.push(spawn_refresh_loop(changes, self.hub.clone(), &shutdown));
            watcher = Some(file_watcher);
        }

        tracing::info!("Serving {} at {}", self.config.name, self.url);

        Ok(RunningServer {
            url: self.url.clone(),
            addr,
            shutdown,
            tasks,
            _watcher: watcher,
        })
    }

    /// Report a build error. `None` (or JSON null) clears it.
    pub fn set_error(&self, error: Option<Value>) {
        self.errors.set_error(error);
    }

    pub fn clear_error(&self) {
        self.errors.clear_error();
    }

    /// Ask every connected browser to reload.
    pub fn refresh(&self) {
        self.errors.refresh();
    }

    /// Startup banner: name, URL and roots, live reload state.
    pub fn banner(&self) -> String {
        ui::banner(&ui::BannerInfo {
            name: self.config.name.clone(),
            url: self.url.clone(),
            roots: self.roots.clone(),
            livereload: self.livereload_enabled(),
        })
    }

    /// URL opened by [`DevServer::open`]: `url`, else the configured `open`
    /// path on the server URL.
    pub fn open_url(&self, url: Option<&str>) -> Option<String> {
        match url {
            Some(url) => Some(url.to_string()),
            None => self.config.open.as_deref().map(|path| {
                format!(
                    "{}/{}",
                    self.url.trim_end_matches('/'),
                    path.trim_start_matches('/')
                )
            }),
        }
    }

    /// Open `url` (or the configured `open` path) in the default browser.
    pub fn open(&self, url: Option<&str>) {
        if let Some(url) = self.open_url(url) {
            open_browser(&url);
        }
    }
}

/// Handle to a started server.
#[derive(Debug)]
pub struct RunningServer {
    url: String,
    addr: SocketAddr,
    shutdown: Arc<watch::Sender<bool>>,
    tasks: Vec<JoinHandle<Result<()>>>,
    _watcher: Option<FileWatcher>,
}

impl RunningServer {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Address the web server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Ask all listeners to shut down gracefully.
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }

    /// A handle that can stop the server while [`RunningServer::wait`] runs.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(self.shutdown.clone())
    }

    /// Wait for every server task to finish.
    ///
    /// # Errors
    ///
    /// Returns the first error a server task ended with
    pub async fn wait(self) -> Result<()> {
        for task in self.tasks {
            task.await
                .map_err(|e| CliError::Server(format!("Server task failed: {}", e)))??;
        }
        Ok(())
    }
}

/// Stops a [`RunningServer`] from elsewhere.
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<watch::Sender<bool>>);

impl StopHandle {
    pub fn stop(&self) {
        let _ = self.0.send(true);
    }
}

fn server_url(host: &str, port: u16) -> String {
    format!("http://{}:{}", host, port)
}

/// Bind `host:port`, trying the next [`PORT_ATTEMPTS`] ports when it is busy.
pub async fn bind_with_fallback(host: &str, port: u16) -> Result<TcpListener> {
    if port < 1024 {
        ui::warning(&format!(
            "Port {} is in privileged range, may require root access",
            port
        ));
    }

    if let Ok(listener) = TcpListener::bind((host, port)).await {
        return Ok(listener);
    }

    for offset in 1..=PORT_ATTEMPTS {
        let Some(candidate) = port.checked_add(offset) else {
            break;
        };
        if let Ok(listener) = TcpListener::bind((host, candidate)).await {
            ui::warning(&format!(
                "Port {} is busy, using port {} instead",
                port, candidate
            ));
            return Ok(listener);
        }
    }

    Err(CliError::Server(format!(
        "No available port in range {}-{} on {}",
        port,
        port.saturating_add(PORT_ATTEMPTS),
        host
    )))
}

fn spawn_server(
    name: &'static str,
    listener: TcpListener,
    app: Router,
    shutdown: &watch::Sender<bool>,
) -> JoinHandle<Result<()>> {
    let mut stop = shutdown.subscribe();
    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stop.wait_for(|stopped| *stopped).await;
            })
            .await
            .map_err(|e| CliError::Server(format!("{} server error: {}", name, e)))?;
        tracing::debug!("{} server stopped", name);
        Ok(())
    })
}

fn spawn_refresh_loop(
    mut changes: mpsc::Receiver<FileChange>,
    hub: ReloadHub,
    shutdown: &watch::Sender<bool>,
) -> JoinHandle<Result<()>> {
    let mut stop = shutdown.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(change) = changes.recv() => {
                    tracing::info!("File changed: {}", change.path().display());
                    hub.refresh(&change.path().to_string_lossy());
                }
                _ = stop.wait_for(|stopped| *stopped) => break,
            }
        }
        Ok(())
    })
}

/// Open a URL in the default browser.
///
/// Uses platform-specific commands:
/// - macOS: `open`
/// - Windows: `start`
/// - Linux: `xdg-open`
fn open_browser(url: &str) {
    use std::process::Command;

    let result = if cfg!(target_os = "macos") {
        Command::new("open").arg(url).spawn()
    } else if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", "start", url]).spawn()
    } else {
        Command::new("xdg-open").arg(url).spawn()
    };

    match result {
        Ok(_) => ui::info(&format!("Opened browser at {}", url)),
        Err(e) => ui::warning(&format!("Failed to open browser: {}", e)),
    }
}
