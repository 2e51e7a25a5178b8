//! Command implementations for the devserve CLI.
//!
//! - [`serve`] - Development server with live reload
//! - [`check`] - Configuration validation
//!
//! Each command provides an `execute` function that takes the parsed command
//! arguments and returns a Result.

pub mod check;
pub mod serve;

// Re-export execute functions for convenience
pub use check::execute as check_execute;
pub use serve::execute as serve_execute;
