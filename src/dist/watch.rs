//! Source tree watcher and rebuild loop.
//!
//! Every change event under the source tree triggers one rebuild. Events are
//! neither debounced nor coalesced: they queue on an unbounded channel in
//! arrival order and the loop awaits each rebuild before taking the next.

use crate::dist::error::{Error, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::{
    future::Future,
    path::{Path, PathBuf},
};
use tokio::sync::mpsc;

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

    fn from_kind(kind: &EventKind, path: PathBuf) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(FileChange::Created(path)),
            EventKind::Modify(_) => Some(FileChange::Modified(path)),
            EventKind::Remove(_) => Some(FileChange::Removed(path)),
            _ => None,
        }
    }
}

/// Recursive watcher over one directory.
///
/// Dropping the watcher stops notifications and closes the channel.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl FileWatcher {
    /// Starts watching `root` recursively.
    ///
    /// Returns the watcher and the receiving end of its change channel.
    pub fn new(root: PathBuf) -> Result<(Self, mpsc::UnboundedReceiver<FileChange>)> {
        if !root.is_dir() {
            return Err(Error::GenericError(format!(
                "cannot watch {}: not a directory",
                root.display()
            )));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let root_clone = root.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    log::warn!("watch error: {}", e);
                    return;
                }
            };

            for path in event.paths {
                if Self::should_ignore(&path, &root_clone) {
                    continue;
                }
                if let Some(change) = FileChange::from_kind(&event.kind, path) {
                    // Receiver gone means the loop has ended.
                    let _ = tx.send(change);
                }
            }
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;

        Ok((
            Self {
                _watcher: watcher,
                root,
            },
            rx,
        ))
    }

    /// Paths outside the root or under hidden directories (editor swap
    /// files, `.git`) never trigger rebuilds.
    fn should_ignore(path: &Path, root: &Path) -> bool {
        let Ok(rel_path) = path.strip_prefix(root) else {
            return true;
        };

        rel_path.components().any(|component| {
            component
                .as_os_str()
                .to_str()
                .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
        })
    }

    /// Get the root directory being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Calls `rebuild` once per received change, in arrival order.
///
/// A failing rebuild is logged and the loop keeps going. Returns the number
/// of rebuilds attempted once the channel closes.
pub async fn rebuild_on_change<F, Fut>(
    changes: &mut mpsc::UnboundedReceiver<FileChange>,
    mut rebuild: F,
) -> usize
where
    F: FnMut(FileChange) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut attempts = 0;
    while let Some(change) = changes.recv().await {
        log::info!("{} changed, rebuilding", change.path().display());
        attempts += 1;
        if let Err(e) = rebuild(change).await {
            log::error!("rebuild failed: {}", e);
        }
    }
    attempts
}

/// Watches `root` and rebuilds on every change until Ctrl-C.
pub async fn watch<F, Fut>(root: PathBuf, rebuild: F) -> Result<()>
where
    F: FnMut(FileChange) -> Fut + Send,
    Fut: Future<Output = Result<()>> + Send,
{
    let (watcher, mut changes) = FileWatcher::new(root)?;
    log::info!("Watching {} for changes", watcher.root().display());

    tokio::select! {
        attempts = rebuild_on_change(&mut changes, rebuild) => {
            log::info!("Watcher closed after {} rebuilds", attempts);
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            log::info!("Interrupted, stopping watch");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_should_ignore_hidden_files() {
        let root = PathBuf::from("/project/src");
        assert!(FileWatcher::should_ignore(
            &PathBuf::from("/project/src/.hidden/file.js"),
            &root
        ));
        assert!(FileWatcher::should_ignore(
            &PathBuf::from("/project/src/js/.treemode.js.swp"),
            &root
        ));
        assert!(!FileWatcher::should_ignore(
            &PathBuf::from("/project/src/js/treemode.js"),
            &root
        ));
    }

    #[test]
    fn test_should_ignore_outside_root() {
        let root = PathBuf::from("/project/src");
        assert!(FileWatcher::should_ignore(
            &PathBuf::from("/project/dist/jsoneditor.js"),
            &root
        ));
    }

    #[test]
    fn access_events_are_not_changes() {
        let path = PathBuf::from("/project/src/index.js");
        let access = EventKind::Access(notify::event::AccessKind::Any);
        assert_eq!(FileChange::from_kind(&access, path.clone()), None);
        let modify = EventKind::Modify(notify::event::ModifyKind::Any);
        assert_eq!(
            FileChange::from_kind(&modify, path.clone()),
            Some(FileChange::Modified(path))
        );
    }

    #[tokio::test]
    async fn two_events_in_one_tick_rebuild_twice_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send(FileChange::Modified("/p/src/a.js".into())).unwrap();
        tx.send(FileChange::Created("/p/src/b.js".into())).unwrap();
        drop(tx);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let attempts = rebuild_on_change(&mut rx, |change| {
            let seen = seen.clone();
            async move {
                seen.lock().unwrap().push(change.path().to_path_buf());
                Ok(())
            }
        })
        .await;

        assert_eq!(attempts, 2);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![PathBuf::from("/p/src/a.js"), PathBuf::from("/p/src/b.js")]
        );
    }

    #[tokio::test]
    async fn failed_rebuild_does_not_stop_the_loop() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send(FileChange::Removed("/p/src/a.js".into())).unwrap();
        tx.send(FileChange::Modified("/p/src/b.js".into())).unwrap();
        drop(tx);

        let attempts = rebuild_on_change(&mut rx, |_| async {
            Err(Error::GenericError("header missing".into()))
        })
        .await;
        assert_eq!(attempts, 2);
    }

    #[test]
    fn watching_a_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileWatcher::new(dir.path().join("src")).is_err());
    }
}
