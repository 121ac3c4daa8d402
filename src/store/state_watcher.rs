use std::{sync::Arc, time::Duration};

use tokio::sync::watch;
use tracing::{debug, error, info, instrument};

use crate::{services::common::Property, tracker};

use super::{FileWatcher, JsonFileStore, StoreError};

/// Quiet period before a burst of file events triggers a reload.
const DEBOUNCE: Duration = Duration::from_millis(500);

/// Reloads the state file when another process edits it.
///
/// On every settled change the store cache is refreshed, the enabled flag is
/// updated, and the returned generation counter is bumped so the tracker can
/// reload its registry between cycles.
pub struct StateWatcher;

impl StateWatcher {
    /// Spawns the watcher task.
    ///
    /// # Errors
    /// Returns `StoreError::Watch` if the state file cannot be watched.
    #[instrument(skip_all, fields(path = %store.path().display()))]
    pub fn spawn(
        store: Arc<JsonFileStore>,
        enabled: Property<bool>,
    ) -> Result<watch::Receiver<u64>, StoreError> {
        let (mut watcher, mut event_rx) = FileWatcher::new(store.path())?;
        watcher.start()?;

        let (generation_tx, generation_rx) = watch::channel(0u64);

        tokio::spawn(async move {
            let _watcher = watcher;
            let mut pending = false;

            let debounce_sleep = tokio::time::sleep(DEBOUNCE);
            tokio::pin!(debounce_sleep);

            loop {
                tokio::select! {
                    event = event_rx.recv() => {
                        let Some(event) = event else {
                            break;
                        };

                        debug!(kind = ?event.kind, "State file event");
                        pending = true;
                        debounce_sleep.as_mut().reset(tokio::time::Instant::now() + DEBOUNCE);
                    }

                    _ = &mut debounce_sleep, if pending => {
                        pending = false;

                        if let Err(e) = store.reload() {
                            error!(error = %e, "Failed to reload state file");
                            continue;
                        }

                        enabled.set(tracker::load_enabled(store.as_ref()));
                        generation_tx.send_modify(|generation| *generation += 1);
                    }
                }
            }
        });

        info!("Watching state file for external changes");
        Ok(generation_rx)
    }
}
