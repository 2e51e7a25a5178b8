//! Logging infrastructure for devserve.
//!
//! Structured logging through the `tracing` ecosystem.
//!
//! # Features
//!
//! - **Verbosity control**: `--verbose` for debug, `--quiet` for errors only
//! - **Color support**: Automatic detection with `--no-color` override
//! - **Environment filters**: Override via `RUST_LOG` environment variable
//!
//! # Example
//!
//! ```rust,no_run
//! use devserve_cli::logger::init_logger;
//! use tracing::{debug, info};
//!
//! init_logger(false, false, false);
//!
//! info!("Starting server");
//! debug!("Serving {} -> {}", "/", "public/index.html");
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used by `--verbose`: request-level detail from our crates.
pub const VERBOSE_FILTER: &str = "devserve=debug,devserve_cli=debug,devserve_inject=debug,tower_http=debug";

/// Filter used by `--quiet`.
pub const QUIET_FILTER: &str = "devserve=error,devserve_cli=error,devserve_inject=error";

/// Filter used when neither flag nor `RUST_LOG` is given.
pub const DEFAULT_FILTER: &str = "devserve=info,devserve_cli=info,devserve_inject=warn";

/// Pick the filter directives for the given flags.
///
/// Order: `--verbose`, then `--quiet`, then `RUST_LOG`, then the default.
pub fn filter_directives(verbose: bool, quiet: bool) -> String {
    if verbose {
        VERBOSE_FILTER.to_string()
    } else if quiet {
        QUIET_FILTER.to_string()
    } else {
        std::env::var(EnvFilter::DEFAULT_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string())
    }
}

/// Initialize the tracing subscriber.
///
/// Call once at the start of the program, before any logging occurs.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = EnvFilter::try_new(filter_directives(verbose, quiet))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .compact();

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// Check if colored output should be enabled.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them, otherwise the
/// terminal is asked.
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::Term::stderr().features().colors_supported()
}
