//! `notify` backed watchers
//!
//! Watches the parent directory rather than the file itself. Producers that
//! publish by rename replace the file's inode, which would silently end a
//! file-level watch; a directory watch keeps seeing the name.
//!
//! The OS backend and the polling backend share event classification and
//! burst settling; only the `notify` watcher behind them differs.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher, WatcherKind};

use super::{watch_dir, ChangeEvent, ChangeKind, WatchError, WatchSource};
use crate::core::config::WatcherConfig;
use crate::foundation::cancel::StopToken;

type EventSender = Sender<notify::Result<Event>>;

/// [`WatchSource`] on top of a `notify` watcher
pub struct NotifyWatcher<W: Watcher = RecommendedWatcher> {
    path: PathBuf,
    file_name: OsString,
    dir: PathBuf,
    watcher: W,
    events: Receiver<notify::Result<Event>>,
    poll_interval: Duration,
    settle: Duration,
}

/// Watcher that rescans the directory instead of using OS notifications
pub type PollingWatcher = NotifyWatcher<notify::PollWatcher>;

impl NotifyWatcher<RecommendedWatcher> {
    /// Register for OS notifications on `path`
    pub fn new(path: &Path, config: &WatcherConfig) -> Result<Self, WatchError> {
        Self::register(path, config, notify::recommended_watcher)
    }
}

impl NotifyWatcher<notify::PollWatcher> {
    /// Poll `path` every `config.poll_interval()`; its current state is the baseline
    pub fn polling(path: &Path, config: &WatcherConfig) -> Result<Self, WatchError> {
        let poll = notify::Config::default()
            .with_poll_interval(config.poll_interval())
            .with_compare_contents(true);
        Self::register(path, config, |tx: EventSender| notify::PollWatcher::new(tx, poll))
    }
}

impl<W: Watcher> NotifyWatcher<W> {
    fn register(
        path: &Path,
        config: &WatcherConfig,
        create: impl FnOnce(EventSender) -> notify::Result<W>,
    ) -> Result<Self, WatchError> {
        let dir = watch_dir(path)?;
        let file_name = path
            .file_name()
            .map(ToOwned::to_owned)
            .ok_or_else(|| WatchError::setup(path, "path has no file name"))?;

        let (tx, events) = mpsc::channel();
        let mut watcher = create(tx).map_err(|e| WatchError::setup(path, e))?;
        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| WatchError::setup(path, e))?;

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            dir,
            watcher,
            events,
            poll_interval: config.poll_interval(),
            settle: config.settle(),
        })
    }

    fn classify(&self, event: &Event) -> Option<ChangeKind> {
        let ours = |p: &PathBuf| p.file_name() == Some(self.file_name.as_os_str());

        match &event.kind {
            EventKind::Create(_) if event.paths.iter().any(ours) => Some(ChangeKind::Created),
            EventKind::Remove(_) if event.paths.iter().any(ours) => Some(ChangeKind::Removed),
            EventKind::Modify(ModifyKind::Name(mode)) => match mode {
                RenameMode::From if event.paths.iter().any(ours) => Some(ChangeKind::Removed),
                RenameMode::Both => {
                    if event.paths.last().is_some_and(ours) {
                        Some(ChangeKind::Created)
                    } else if event.paths.first().is_some_and(ours) {
                        Some(ChangeKind::Removed)
                    } else {
                        None
                    }
                }
                _ if event.paths.iter().any(ours) => Some(ChangeKind::Created),
                _ => None,
            },
            EventKind::Modify(_) | EventKind::Any | EventKind::Other if event.paths.iter().any(ours) => {
                Some(ChangeKind::Modified)
            }
            _ => None,
        }
    }

    /// Swallow the rest of a burst, keeping the latest relevant kind
    fn settle(&self, mut kind: ChangeKind) -> Result<ChangeKind, WatchError> {
        loop {
            match self.events.recv_timeout(self.settle) {
                Ok(Ok(event)) => {
                    if let Some(next) = self.classify(&event) {
                        kind = next;
                    }
                }
                Ok(Err(e)) => log::warn!("Watch backend error on {}: {e}", self.path.display()),
                Err(RecvTimeoutError::Timeout) => return Ok(kind),
                Err(RecvTimeoutError::Disconnected) => return Err(WatchError::Disconnected),
            }
        }
    }

    /// Re-register the directory watch
    ///
    /// Idempotent for OS watches. A polling watch would rescan and adopt the
    /// current state as its baseline, hiding changes made since the last
    /// scan, so it is left running as is.
    fn rearm(&mut self) -> Result<(), WatchError> {
        if W::kind() == WatcherKind::PollWatcher {
            return Ok(());
        }
        self.watcher
            .watch(&self.dir, RecursiveMode::NonRecursive)
            .map_err(|e| WatchError::setup(&self.path, e))
    }
}

impl<W: Watcher> WatchSource for NotifyWatcher<W> {
    fn await_change(&mut self, stop: &StopToken) -> Result<Option<ChangeEvent>, WatchError> {
        log::debug!("Waiting for change to {} ({:?})", self.path.display(), W::kind());

        loop {
            if stop.is_stopped() {
                return Ok(None);
            }

            match self.events.recv_timeout(self.poll_interval) {
                Ok(Ok(event)) => {
                    let Some(kind) = self.classify(&event) else {
                        continue;
                    };
                    let kind = self.settle(kind)?;
                    self.rearm()?;
                    log::debug!("{} changed: {kind:?}", self.path.display());
                    return Ok(Some(ChangeEvent {
                        kind,
                        path: self.path.clone(),
                    }));
                }
                Ok(Err(e)) => log::warn!("Watch backend error on {}: {e}", self.path.display()),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return Err(WatchError::Disconnected),
            }
        }
    }
}
