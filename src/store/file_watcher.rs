use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher, recommended_watcher};
use tokio::sync::mpsc;

use super::StoreError;

/// Represents a file system event for a watched file.
#[derive(Debug, Clone)]
pub struct FileEvent {
    /// The path of the file that changed
    pub path: PathBuf,
    /// The type of change that occurred
    pub kind: FileEventKind,
}

/// The type of file system change that occurred.
#[derive(Debug, Clone, PartialEq)]
pub enum FileEventKind {
    /// File was modified
    Modified,
    /// File was created
    Created,
    /// File was removed
    Removed,
}

/// Watches a single file through its parent directory.
///
/// The state file is replaced by rename on every write, so the directory is
/// watched and events are filtered down to the file name. Events are
/// forwarded to a Tokio channel.
pub struct FileWatcher {
    watcher: RecommendedWatcher,
    directory: PathBuf,
}

impl FileWatcher {
    /// Creates a watcher for `file` and returns it with its event receiver.
    ///
    /// Uses an unbounded channel since file events are infrequent but bursty.
    ///
    /// # Errors
    /// Returns `StoreError::Watch` if the file has no parent directory or the
    /// underlying watcher cannot be initialized.
    pub fn new(file: &Path) -> Result<(Self, mpsc::UnboundedReceiver<FileEvent>), StoreError> {
        let watch_error = |details: String| StoreError::Watch {
            path: file.to_path_buf(),
            details,
        };

        let directory = file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| watch_error("state file has no parent directory".to_string()))?
            .to_path_buf();
        let file_name = file
            .file_name()
            .ok_or_else(|| watch_error("state file has no file name".to_string()))?
            .to_os_string();

        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let watcher = recommended_watcher(move |res: notify::Result<Event>| {
            let Ok(event) = res else {
                return;
            };

            let kind = match event.kind {
                EventKind::Create(_) => FileEventKind::Created,
                EventKind::Modify(_) => FileEventKind::Modified,
                EventKind::Remove(_) => FileEventKind::Removed,
                _ => return,
            };

            for path in event.paths {
                if path.file_name() != Some(file_name.as_os_str()) {
                    continue;
                }

                let _ = event_tx.send(FileEvent {
                    path,
                    kind: kind.clone(),
                });
            }
        })
        .map_err(|e| watch_error(e.to_string()))?;

        Ok((Self { watcher, directory }, event_rx))
    }

    /// Starts delivering events.
    ///
    /// Creates the watched directory if it does not exist yet.
    ///
    /// # Errors
    /// Returns `StoreError` if the directory cannot be created or watched.
    pub fn start(&mut self) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.directory)
            .map_err(|e| StoreError::io(e, &self.directory))?;

        self.watcher
            .watch(&self.directory, RecursiveMode::NonRecursive)
            .map_err(|e| StoreError::Watch {
                path: self.directory.clone(),
                details: e.to_string(),
            })
    }
}
