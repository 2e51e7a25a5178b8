//! Process-wide build error state.
//!
//! A build tool (or the file watcher driving it) reports the last build error
//! here. Every change asks the reload transport to refresh connected browsers
//! so the overlay appears or disappears.

use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;

/// Path passed to [`ReloadNotifier::refresh`] for a full-page reload.
pub const FULL_RELOAD_PATH: &str = "/";

/// Something that can tell connected browsers to reload.
pub trait ReloadNotifier: Send + Sync {
    /// Notify clients that `path` changed.
    fn refresh(&self, path: &str);
}

/// Notifier that does nothing, for running without a reload transport.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl ReloadNotifier for NoopNotifier {
    fn refresh(&self, _path: &str) {}
}

/// Holder of the last reported build error.
pub struct ErrorState {
    error: RwLock<Option<Value>>,
    notifier: Arc<dyn ReloadNotifier>,
}

impl ErrorState {
    /// Create an empty error state that refreshes through `notifier`.
    pub fn new(notifier: Arc<dyn ReloadNotifier>) -> Self {
        Self {
            error: RwLock::new(None),
            notifier,
        }
    }

    /// Snapshot of the current error.
    pub fn current(&self) -> Option<Value> {
        self.error.read().clone()
    }

    /// Whether an error is currently set.
    pub fn has_error(&self) -> bool {
        self.error.read().is_some()
    }

    /// Replace the current error.
    ///
    /// `None` (or a JSON `null`) clears it. Clearing an already clear state
    /// is a no-op and does not refresh; any other call refreshes.
    pub fn set_error(&self, error: Option<Value>) {
        let error = error.filter(|value| !value.is_null());
        let has_error = error.is_some();
        {
            let mut current = self.error.write();
            if error.is_none() && current.is_none() {
                return;
            }
            *current = error;
        }
        tracing::debug!(has_error, "Build error state changed");
        self.refresh();
    }

    /// Clear the current error.
    pub fn clear_error(&self) {
        self.set_error(None);
    }

    /// Ask connected clients for a full-page reload.
    pub fn refresh(&self) {
        self.notifier.refresh(FULL_RELOAD_PATH);
    }
}

impl std::fmt::Debug for ErrorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorState")
            .field("error", &*self.error.read())
            .finish_non_exhaustive()
    }
}
