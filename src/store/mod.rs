//! File-backed persistence for tracker state.
//!
//! State lives in a single JSON object of string keys to string values. The
//! daemon and the CLI both open the same file; a watcher lets the daemon pick
//! up edits the CLI makes while it is running.

mod error;
mod file_watcher;
mod json_file;
mod state_watcher;


pub use error::StoreError;
pub use file_watcher::{FileEvent, FileEventKind, FileWatcher};
pub use json_file::JsonFileStore;
pub use state_watcher::StateWatcher;
