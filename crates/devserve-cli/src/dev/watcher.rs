//! File system watcher with debouncing for live reload.
//!
//! Watches every configured path recursively and filters changes, ignoring
//! node_modules, hidden files and the configured exclusion patterns.

use crate::error::{CliError, Result, ResultExt};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Always excluded from watching.
pub const DEFAULT_EXCLUSION: &str = "node_modules";

/// File change event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    /// File was modified
    Modified(PathBuf),
    /// File was created
    Created(PathBuf),
    /// File was removed
    Removed(PathBuf),
}

impl FileChange {
    /// Get the path affected by this change.
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }
}

/// File watcher with debouncing and filtering.
///
/// Sends change events through a channel. Repeated events for the same file
/// inside the debounce window are dropped.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    roots: Vec<PathBuf>,
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher")
            .field("roots", &self.roots)
            .finish_non_exhaustive()
    }
}

impl FileWatcher {
    /// Create a new file watcher.
    ///
    /// # Arguments
    ///
    /// * `paths` - Files or directories to watch recursively
    /// * `exclusions` - Patterns to ignore (`*.ext` or a path prefix)
    /// * `debounce_ms` - Debounce delay in milliseconds
    ///
    /// # Errors
    ///
    /// Returns error if a path doesn't exist or the watcher cannot be created
    pub fn new(
        paths: Vec<PathBuf>,
        exclusions: Vec<String>,
        debounce_ms: u64,
    ) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        let mut roots = Vec::with_capacity(paths.len());
        for path in paths {
            if !path.exists() {
                return Err(CliError::FileNotFound(path));
            }
            roots.push(path.canonicalize().with_path(&path)?);
        }

        let mut patterns = exclusions;
        if !patterns.iter().any(|p| p == DEFAULT_EXCLUSION) {
            patterns.push(DEFAULT_EXCLUSION.to_string());
        }

        let (tx, rx) = mpsc::channel(100);
        let debounce = Duration::from_millis(debounce_ms);
        let mut last_seen: HashMap<PathBuf, Instant> = HashMap::new();
        let filter_roots = roots.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(err) => {
                    tracing::warn!("File watcher error: {}", err);
                    return;
                }
            };

            for path in &event.paths {
                if should_ignore(path, &filter_roots, &patterns) {
                    continue;
                }

                let now = Instant::now();
                if let Some(last) = last_seen.get(path) {
                    if now.duration_since(*last) < debounce {
                        continue;
                    }
                }
                last_seen.retain(|_, seen| now.duration_since(*seen) < debounce);
                last_seen.insert(path.clone(), now);

                let change = match event.kind {
                    EventKind::Create(_) => FileChange::Created(path.clone()),
                    EventKind::Modify(_) => FileChange::Modified(path.clone()),
                    EventKind::Remove(_) => FileChange::Removed(path.clone()),
                    _ => continue,
                };

                // The receiver is gone once the server stops.
                if tx.blocking_send(change).is_err() {
                    return;
                }
            }
        })?;

        for root in &roots {
            watcher.watch(root, RecursiveMode::Recursive)?;
        }

        Ok((
            Self {
                _watcher: watcher,
                roots,
            },
            rx,
        ))
    }

    /// The watched paths, canonicalized.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

/// Check if a path should be ignored.
///
/// Paths outside every watched root are always ignored.
pub fn should_ignore(path: &Path, roots: &[PathBuf], patterns: &[String]) -> bool {
    let Some(rel_path) = roots.iter().find_map(|root| path.strip_prefix(root).ok()) else {
        return true;
    };

    let path_str = rel_path.to_string_lossy().replace('\\', "/");

    for pattern in patterns {
        if let Some(suffix) = pattern.strip_prefix('*') {
            // Extension pattern like "*.log"
            if path_str.ends_with(suffix) {
                return true;
            }
        } else {
            // Directory or path prefix like "node_modules" or "dist/cache"
            let pattern = pattern.trim_matches('/');
            if path_str == pattern
                || path_str.starts_with(&format!("{}/", pattern))
                || path_str.contains(&format!("/{}/", pattern))
                || path_str.ends_with(&format!("/{}", pattern))
            {
                return true;
            }
        }
    }

    // Ignore hidden files and directories
    rel_path.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
    })
}
