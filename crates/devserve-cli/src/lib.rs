//! devserve CLI - static development server with live reload.
//!
//! This crate provides the `devserve` binary and the pieces it is built from:
//! static file serving across several roots, the live reload transport, the
//! file watcher, and the axum adapter for `devserve-inject`.
//!
//! # Architecture
//!
//! - [`error`] - Error types with actionable messages
//! - [`logger`] - Structured logging with tracing
//! - [`ui`] - Status lines and the startup banner
//! - [`cli`] - Argument parsing
//! - [`config`] - Layered configuration (file, env, flags)
//! - [`dev`] - The development server
//! - [`commands`] - `serve` and `check`
//!
//! # Example
//!
//! ```rust,no_run
//! use devserve_cli::config::DevServeConfig;
//! use devserve_cli::dev::DevServer;
//!
//! # async fn run() -> devserve_cli::Result<()> {
//! let mut server = DevServer::new(DevServeConfig::default())?;
//! let running = server.start().await?;
//! println!("{}", server.banner());
//! running.wait().await
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod dev;
pub mod error;
pub mod logger;
pub mod ui;

// Re-export commonly used types
pub use error::{CliError, ConfigError, Result, ResultExt};
