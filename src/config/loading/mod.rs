mod file_creation;

use std::{fs, path::Path};

use file_creation::create_default_config_file;
use tracing::info;

use super::Config;
use crate::{ExploredError, Result};

impl Config {
    /// Loads and validates the configuration file at `path`.
    ///
    /// A missing file is created with a commented header first, so a fresh
    /// install runs on defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration file cannot be created or read
    /// - The TOML content is invalid
    /// - A value is out of range
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            create_default_config_file(path)?;
            info!(path = %path.display(), "Created default configuration file");
        }

        let content = fs::read_to_string(path).map_err(|e| ExploredError::IoError {
            path: path.to_path_buf(),
            details: format!("Failed to read config file: {e}"),
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|e| ExploredError::toml_parse(e, Some(path)))?;
        config.validate()?;

        Ok(config)
    }

    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML is invalid or a value is out of range.
    pub fn from_toml_str(content: &str) -> Result<Config> {
        let config: Config =
            toml::from_str(content).map_err(|e| ExploredError::toml_parse(e, None))?;
        config.validate()?;

        Ok(config)
    }
}
