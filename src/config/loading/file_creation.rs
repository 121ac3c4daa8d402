use std::{fs, path::Path};

use crate::{ExploredError, Result};

const DEFAULT_HEADER: &str = "\
# explored configuration file
#
# Every setting is optional. Run `explored config show` to print the
# effective configuration and `explored config schema` for all options.
";

/// Creates a default configuration file if it doesn't exist
pub fn create_default_config_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ExploredError::IoError {
            path: parent.to_path_buf(),
            details: format!("Failed to create config directory: {e}"),
        })?;
    }

    fs::write(path, DEFAULT_HEADER).map_err(|e| ExploredError::IoError {
        path: path.to_path_buf(),
        details: format!("Failed to create config file: {e}"),
    })?;

    Ok(())
}
