use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{Command, CommandMetadata, CommandResult},
    tracker::{ExploredRegistry, PersistenceStore},
};

/// Command clearing the explored registry.
pub struct ResetCommand {
    store: Arc<dyn PersistenceStore>,
}

impl ResetCommand {
    /// Creates a new ResetCommand writing to `store`.
    pub fn new(store: Arc<dyn PersistenceStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Command for ResetCommand {
    async fn execute(&self, _args: &[String]) -> CommandResult {
        let mut cleared = 0;
        ExploredRegistry::update(self.store.as_ref(), |registry| {
            cleared = registry.len();
            registry.clear();
            true
        })?;

        Ok(format!("Cleared {cleared} explored track(s)"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "reset".to_string(),
            description: "Clear the explored registry".to_string(),
            category: "registry".to_string(),
            args: vec![],
            examples: vec!["explored registry reset".to_string()],
        }
    }
}
