use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{ExploredError, Result};

/// Listening progress settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Milliseconds of listening after which a track counts as explored.
    pub threshold_ms: u64,

    /// Milliseconds between two player polls.
    pub poll_interval_ms: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            threshold_ms: 30_000,
            poll_interval_ms: 100,
        }
    }
}

impl TrackerConfig {
    pub(super) fn validate(&self) -> Result<()> {
        if self.threshold_ms == 0 {
            return Err(ExploredError::invalid_field(
                "tracker",
                "threshold_ms",
                "must be greater than zero",
            ));
        }

        if self.poll_interval_ms == 0 {
            return Err(ExploredError::invalid_field(
                "tracker",
                "poll_interval_ms",
                "must be greater than zero",
            ));
        }

        Ok(())
    }
}
