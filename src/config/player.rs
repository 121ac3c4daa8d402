use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{ExploredError, Result};

/// Which MPRIS player is followed and how it is probed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// Case-insensitive substring of the bus name of the player to follow,
    /// e.g. `"spotify"`. When unset, the first playing player is followed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Bus name substrings of players that are never followed.
    pub ignored_players: Vec<String>,

    /// Position drift in milliseconds that counts as a seek.
    pub seek_tolerance_ms: u64,

    /// First delay in milliseconds while waiting for a player to appear.
    pub initial_backoff_ms: u64,

    /// Upper bound in milliseconds for the readiness delay.
    pub max_backoff_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            name: None,
            ignored_players: Vec::new(),
            seek_tolerance_ms: 1_500,
            initial_backoff_ms: 250,
            max_backoff_ms: 5_000,
        }
    }
}

impl PlayerConfig {
    pub(super) fn validate(&self) -> Result<()> {
        if self.initial_backoff_ms == 0 {
            return Err(ExploredError::invalid_field(
                "player",
                "initial_backoff_ms",
                "must be greater than zero",
            ));
        }

        if self.max_backoff_ms < self.initial_backoff_ms {
            return Err(ExploredError::invalid_field(
                "player",
                "max_backoff_ms",
                format!(
                    "must be at least initial_backoff_ms ({})",
                    self.initial_backoff_ms
                ),
            ));
        }

        Ok(())
    }
}
