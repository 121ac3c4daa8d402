use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{Command, CommandMetadata, CommandResult},
    tracker::{ExploredRegistry, PersistenceStore},
};

/// Command printing every explored track id.
///
/// Ids are printed one per line in sorted order, followed by a count.
pub struct ListCommand {
    store: Arc<dyn PersistenceStore>,
}

impl ListCommand {
    /// Creates a new ListCommand reading from `store`.
    pub fn new(store: Arc<dyn PersistenceStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Command for ListCommand {
    async fn execute(&self, _args: &[String]) -> CommandResult {
        let registry = ExploredRegistry::load(self.store.as_ref());

        if registry.is_empty() {
            return Ok("No explored tracks".to_string());
        }

        let mut lines: Vec<String> = registry.iter().map(str::to_string).collect();
        lines.push(format!("{} explored track(s)", registry.len()));

        Ok(lines.join("\n"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "list".to_string(),
            description: "List explored tracks".to_string(),
            category: "registry".to_string(),
            args: vec![],
            examples: vec!["explored registry list".to_string()],
        }
    }
}
