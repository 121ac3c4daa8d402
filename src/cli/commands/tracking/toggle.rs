use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{Command, CommandMetadata, CommandResult},
    tracker::{PersistenceStore, save_enabled},
};

/// Command turning tracking on.
pub struct EnableCommand {
    store: Arc<dyn PersistenceStore>,
}

impl EnableCommand {
    /// Creates a new EnableCommand writing to `store`.
    pub fn new(store: Arc<dyn PersistenceStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Command for EnableCommand {
    async fn execute(&self, _args: &[String]) -> CommandResult {
        save_enabled(self.store.as_ref(), true)?;
        Ok("Tracking enabled".to_string())
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "enable".to_string(),
            description: "Resume tracking and skipping".to_string(),
            category: "tracking".to_string(),
            args: vec![],
            examples: vec!["explored tracking enable".to_string()],
        }
    }
}

/// Command turning tracking off.
///
/// While disabled the daemon treats the player as stopped: nothing accrues
/// and nothing is skipped.
pub struct DisableCommand {
    store: Arc<dyn PersistenceStore>,
}

impl DisableCommand {
    /// Creates a new DisableCommand writing to `store`.
    pub fn new(store: Arc<dyn PersistenceStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Command for DisableCommand {
    async fn execute(&self, _args: &[String]) -> CommandResult {
        save_enabled(self.store.as_ref(), false)?;
        Ok("Tracking disabled".to_string())
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "disable".to_string(),
            description: "Pause tracking and skipping".to_string(),
            category: "tracking".to_string(),
            args: vec![],
            examples: vec!["explored tracking disable".to_string()],
        }
    }
}
