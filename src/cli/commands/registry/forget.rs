use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{CliError, Command, CommandArg, CommandMetadata, CommandResult},
    tracker::{ExploredRegistry, PersistenceStore},
};

/// Command removing one track from the explored registry.
///
/// A forgotten track is no longer skipped and can be discovered again.
pub struct ForgetCommand {
    store: Arc<dyn PersistenceStore>,
}

impl ForgetCommand {
    /// Creates a new ForgetCommand writing to `store`.
    pub fn new(store: Arc<dyn PersistenceStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Command for ForgetCommand {
    /// # Errors
    ///
    /// * `CliError::InvalidArguments` - If the track is not in the registry
    /// * `CliError::Store` - If the registry cannot be written
    async fn execute(&self, args: &[String]) -> CommandResult {
        let track_id = args.first().ok_or_else(|| {
            CliError::InvalidArguments("Expected <track-id> argument for 'forget'".to_string())
        })?;

        let mut removed = false;
        ExploredRegistry::update(self.store.as_ref(), |registry| {
            removed = registry.remove(track_id);
            removed
        })?;

        if !removed {
            return Err(CliError::InvalidArguments(format!(
                "Track '{track_id}' is not explored"
            )));
        }

        Ok(format!("Forgot {track_id}"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "forget".to_string(),
            description: "Remove a track from the explored registry".to_string(),
            category: "registry".to_string(),
            args: vec![CommandArg {
                name: "track-id".to_string(),
                description: "Track id as printed by 'registry list'".to_string(),
                required: true,
            }],
            examples: vec![
                "explored registry forget spotify:track:4uLU6hMCjMI75M1A2tKUQC".to_string(),
            ],
        }
    }
}
