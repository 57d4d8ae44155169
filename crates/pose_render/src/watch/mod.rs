//! File change watching
//!
//! A [`WatchSource`] blocks until the message file is created, modified or
//! removed. [`NotifyWatcher`] uses OS notifications; [`PollingWatcher`] is the
//! same source driven by `notify`'s polling backend for filesystems without
//! usable notifications. Pipeline logic does not care which one it gets.

mod notifier;
mod readiness;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::config::{WatcherBackend, WatcherConfig};
use crate::foundation::cancel::StopToken;

pub use notifier::{NotifyWatcher, PollingWatcher};
pub use readiness::{read_ready, ReadError};

/// What happened to the watched file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File appeared (including rename into place)
    Created,
    /// File contents or metadata changed
    Modified,
    /// File disappeared
    Removed,
}

/// A change to the watched file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Kind of change
    pub kind: ChangeKind,
    /// Watched path
    pub path: PathBuf,
}

/// Watcher errors
#[derive(Error, Debug)]
pub enum WatchError {
    /// Registration for change notifications failed
    #[error("Cannot watch {path}: {reason}")]
    Setup {
        /// Path that could not be watched
        path: PathBuf,
        /// Why
        reason: String,
    },

    /// Notification channel closed while waiting
    #[error("Watch backend disconnected")]
    Disconnected,
}

impl WatchError {
    pub(crate) fn setup(path: &Path, reason: impl ToString) -> Self {
        Self::Setup {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Blocking source of change events for one fixed path
pub trait WatchSource {
    /// Block until the next change
    ///
    /// Returns `Ok(None)` once `stop` is set. The registration is re-armed
    /// before returning so no later write is missed.
    fn await_change(&mut self, stop: &StopToken) -> Result<Option<ChangeEvent>, WatchError>;
}

impl<T: WatchSource + ?Sized> WatchSource for Box<T> {
    fn await_change(&mut self, stop: &StopToken) -> Result<Option<ChangeEvent>, WatchError> {
        (**self).await_change(stop)
    }
}

/// Build the configured watcher for `path`
pub fn from_config(path: &Path, config: &WatcherConfig) -> Result<Box<dyn WatchSource>, WatchError> {
    let source: Box<dyn WatchSource> = match config.backend {
        WatcherBackend::Native => Box::new(NotifyWatcher::new(path, config)?),
        WatcherBackend::Poll => Box::new(PollingWatcher::polling(path, config)?),
    };
    log::info!("Watching {} ({:?} backend)", path.display(), config.backend);
    Ok(source)
}

/// Directory containing `path`, which must exist
pub(crate) fn watch_dir(path: &Path) -> Result<PathBuf, WatchError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !dir.is_dir() {
        return Err(WatchError::setup(path, format!("directory {} does not exist", dir.display())));
    }
    if path.file_name().is_none() {
        return Err(WatchError::setup(path, "path has no file name"));
    }
    Ok(dir)
}
