use async_trait::async_trait;

use crate::{
    cli::{CliError, Command, CommandMetadata, CommandResult},
    config::Config,
};

/// Command printing the JSON schema of the configuration file.
///
/// Useful for editor completion of `config.toml`.
pub struct SchemaCommand {}

impl SchemaCommand {
    /// Creates a new SchemaCommand
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for SchemaCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Command for SchemaCommand {
    async fn execute(&self, _args: &[String]) -> CommandResult {
        let schema = schemars::schema_for!(Config);

        serde_json::to_string_pretty(&schema).map_err(|e| CliError::ConfigError(e.to_string()))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "schema".to_string(),
            description: "Print the configuration JSON schema".to_string(),
            category: "config".to_string(),
            args: vec![],
            examples: vec!["explored config schema > explored.schema.json".to_string()],
        }
    }
}
