use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::validation::{parse_index, parse_port};

/// Available devserve subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve content roots with live reload
    ///
    /// Files are looked up in each root in order; the first match wins.
    /// HTML responses get a live-reload client injected before </body>.
    Serve(ServeArgs),

    /// Validate configuration
    ///
    /// Loads devserve.config.json, environment variables and flags, checks
    /// the result, and prints the resolved configuration as JSON.
    Check(CheckArgs),
}

/// Arguments for the serve command
#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Content roots to serve, in lookup order
    ///
    /// Examples:
    ///   devserve serve public
    ///   devserve serve public dist
    #[arg(value_name = "ROOT")]
    pub roots: Vec<PathBuf>,

    /// Host to bind the web server to
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port for the web server
    ///
    /// If the port is busy the next free one (up to +10) is used.
    #[arg(short, long, value_parser = parse_port, value_name = "PORT")]
    pub port: Option<u16>,

    /// Display name shown in the banner
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// File served for directory requests
    #[arg(long, value_parser = parse_index, value_name = "FILE")]
    pub index: Option<String>,

    /// Open the browser on start, optionally at PATH
    #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = "/")]
    pub open: Option<String>,

    /// Enable live reload, watching PATH for changes
    ///
    /// Repeat to watch several paths. Without any watch path live reload
    /// stays off.
    #[arg(short, long, value_name = "PATH")]
    pub watch: Vec<PathBuf>,

    /// Port of the live reload server
    #[arg(long, value_parser = parse_port, value_name = "PORT")]
    pub livereload_port: Option<u16>,

    /// Scheme of the live reload client URL
    ///
    /// Use https when pages are served through a TLS proxy.
    #[arg(long, value_name = "SCHEME", value_parser = ["http", "https"])]
    pub livereload_protocol: Option<String>,

    /// Explicit URL of the live reload client script
    #[arg(long, value_name = "URL")]
    pub livereload_src: Option<String>,

    /// HTML template for the build error overlay
    ///
    /// Placeholders like ${location} or ${message} are filled from the
    /// reported error.
    #[arg(long, value_name = "FILE")]
    pub error_page: Option<PathBuf>,

    /// Pattern excluded from watching (e.g. "*.log", "target")
    #[arg(long, value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Path to devserve.config.json
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments for the check command
#[derive(Args, Debug, Default, Clone)]
pub struct CheckArgs {
    /// Path to devserve.config.json
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the JSON schema of the config file instead
    #[arg(long)]
    pub schema: bool,
}
