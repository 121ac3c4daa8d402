//! Configuration schema definitions and validation.
//!
//! Defines the configuration structure for explored: general settings, the
//! progress tracker and the followed media player. All configurations are
//! serializable to/from TOML format.

mod general;
mod loading;
mod paths;
mod player;
mod tracker;


pub use general::{GeneralConfig, LogLevel};
pub use paths::ConfigPaths;
pub use player::PlayerConfig;
pub use tracker::TrackerConfig;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Main configuration structure for explored.
///
/// Represents the complete configuration schema that can be loaded
/// from TOML files. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Listening progress tracking.
    #[serde(default)]
    pub tracker: TrackerConfig,

    /// Media player selection and polling.
    #[serde(default)]
    pub player: PlayerConfig,
}

impl Config {
    /// Checks value ranges that the TOML schema cannot express.
    ///
    /// # Errors
    /// Returns `ExploredError::ConfigValidation` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        self.tracker.validate()?;
        self.player.validate()
    }
}
