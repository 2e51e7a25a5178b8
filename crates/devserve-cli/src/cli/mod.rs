//! Command-line interface definition for devserve.
//!
//! # Command Structure
//!
//! - `devserve serve` - Serve content roots with live reload
//! - `devserve check` - Validate and print the resolved configuration

mod commands;
mod tests;
mod validation;

use clap::Parser;

pub use commands::{CheckArgs, Command, ServeArgs};
pub use validation::{parse_index, parse_port};

/// devserve - static development server with live reload
#[derive(Parser, Debug)]
#[command(
    name = "devserve",
    version,
    about = "Static development server with live reload",
    long_about = "devserve serves one or more content directories over HTTP, injects a live-reload\n\
                  client into HTML pages, and shows build errors reported by your tooling as an\n\
                  in-page overlay."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    ///
    /// Logs every request with the file it resolved to.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
