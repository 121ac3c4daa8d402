use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{Command, CommandMetadata, CommandResult},
    tracker::{ExploredRegistry, PersistenceStore, load_enabled},
};

/// Command printing the enabled flag and the registry size.
pub struct StatusCommand {
    store: Arc<dyn PersistenceStore>,
}

impl StatusCommand {
    /// Creates a new StatusCommand reading from `store`.
    pub fn new(store: Arc<dyn PersistenceStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Command for StatusCommand {
    async fn execute(&self, _args: &[String]) -> CommandResult {
        let enabled = load_enabled(self.store.as_ref());
        let registry = ExploredRegistry::load(self.store.as_ref());

        Ok(format!(
            "tracking: {}\nexplored: {}",
            if enabled { "enabled" } else { "disabled" },
            registry.len()
        ))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "status".to_string(),
            description: "Show whether tracking is enabled and how many tracks are explored"
                .to_string(),
            category: "tracking".to_string(),
            args: vec![],
            examples: vec!["explored tracking status".to_string()],
        }
    }
}
