//! Development server module.
//!
//! Provides the pieces behind `devserve serve`:
//! - Static files from several roots with ordered fallback
//! - Live reload client injection into HTML responses
//! - Reload events via Server-Sent Events
//! - File watching with debouncing
//! - Build error overlay fed through an HTTP API

pub mod inject_layer;
pub mod reload;
pub mod server;
pub mod static_files;
pub mod watcher;

// Re-exports
pub use inject_layer::inject_livereload;
pub use reload::{ReloadEvent, ReloadHub};
pub use server::{DevServer, RunningServer, StopHandle};
pub use static_files::{serve_static, StaticFiles};
pub use watcher::{FileChange, FileWatcher};
