//! Serve command implementation.
//!
//! Orchestrates the dev server lifecycle:
//! - Configuration loading and validation
//! - Web server, live reload server and file watcher startup
//! - Graceful shutdown on Ctrl+C

use crate::cli::ServeArgs;
use crate::config::{ConfigOverrides, DevServeConfig};
use crate::dev::DevServer;
use crate::error::Result;
use crate::ui;
use tokio::signal;

/// Execute the serve command.
///
/// `verbose` is the global `--verbose` flag; it also turns on per-request
/// logging.
///
/// # Errors
///
/// Returns errors for invalid configuration, unbindable ports and missing
/// watch paths.
pub async fn execute(args: ServeArgs, verbose: bool) -> Result<()> {
    let mut overrides = ConfigOverrides::from(&args);
    overrides.verbose = verbose;

    let config = DevServeConfig::load(&overrides, args.config.as_deref())?;
    config.validate()?;

    let mut server = DevServer::new(config)?;
    let running = server.start().await?;

    println!("{}", server.banner());
    server.open(None);
    ui::info("Press Ctrl+C to stop");

    let stop = running.stop_handle();
    let wait = running.wait();
    tokio::pin!(wait);

    tokio::select! {
        result = &mut wait => {
            result?;
            ui::warning("Server stopped unexpectedly");
            return Ok(());
        }
        result = signal::ctrl_c() => {
            result?;
            ui::info("Shutting down development server...");
        }
    }

    stop.stop();
    wait.await?;

    ui::success("Development server stopped");
    Ok(())
}
