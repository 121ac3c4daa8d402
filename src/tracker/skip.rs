use std::sync::Arc;

use tracing::{info, warn};

use super::PlaybackController;

/// Skips tracks that have already been explored.
pub struct SkipController {
    controller: Arc<dyn PlaybackController>,
}

impl SkipController {
    /// Creates a skip controller driving `controller`.
    pub fn new(controller: Arc<dyn PlaybackController>) -> Self {
        Self { controller }
    }

    /// Asks the host to advance to the next track.
    ///
    /// Fire-and-forget: a failure is logged and not retried.
    pub async fn skip_next(&self, track_id: &str) {
        info!(track_id, "Skipping explored track");

        if let Err(e) = self.controller.next().await {
            warn!(track_id, error = %e, "Skip command failed");
        }
    }
}
