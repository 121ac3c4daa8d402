use std::sync::Arc;

use super::{CliError, CommandRegistry, formatting::Style};
use crate::{config::Config, tracker::PersistenceStore};

/// High-level service for managing and executing CLI commands.
///
/// Provides a unified interface for command registration, discovery, and execution.
/// Commands are organized by category and can be listed or executed by name.
pub struct CliService {
    registry: CommandRegistry,
}

impl CliService {
    /// Creates a new CLI service with all available commands registered.
    ///
    /// # Arguments
    /// * `store` - State store holding the explored registry and enabled flag
    /// * `config` - Effective configuration, for the `config` commands
    pub fn new(store: Arc<dyn PersistenceStore>, config: Config) -> Self {
        let mut registry = CommandRegistry::new(store, Arc::new(config));
        registry.register_all_commands();

        CliService { registry }
    }

    /// Executes a command by category and name with the provided arguments.
    ///
    /// The `help` category prints the command overview instead.
    ///
    /// # Errors
    /// Returns `CliError::CommandNotFound` if the command doesn't exist in the category,
    /// or the command's own error if it fails.
    pub async fn execute_command(
        &self,
        category: &str,
        command_name: &str,
        args: &[String],
    ) -> Result<String, CliError> {
        if category == "help" {
            return Ok(self.help_text());
        }

        self.registry.execute(category, command_name, args).await
    }

    /// Lists all available commands as (category, command names) pairs.
    pub fn list_all(&self) -> Vec<(String, Vec<String>)> {
        self.registry
            .list_commands()
            .into_iter()
            .map(|(category, commands)| {
                let names = commands.into_iter().map(|command| command.name).collect();
                (category, names)
            })
            .collect()
    }

    /// Renders the help overview of every registered command.
    pub fn help_text(&self) -> String {
        let mut lines = vec![
            Style::Title.paint("explored"),
            Style::Muted.paint(
                "Tracks listening time and skips tracks you have already explored.",
            ),
            String::new(),
            Style::Heading.paint("Usage:"),
            format!(
                "  explored {} {} {}",
                Style::Category.paint("<category>"),
                Style::Command.paint("<command>"),
                Style::Muted.paint("[args]"),
            ),
            format!(
                "  explored {}  {}",
                Style::Command.paint("run"),
                Style::Muted.paint("Start the tracking daemon"),
            ),
        ];

        for (category, commands) in self.registry.list_commands() {
            lines.push(String::new());
            lines.push(Style::Category.paint(&category));

            for command in commands {
                let args: Vec<String> = command
                    .args
                    .iter()
                    .map(|arg| {
                        if arg.required {
                            format!("<{}>", arg.name)
                        } else {
                            format!("[{}]", arg.name)
                        }
                    })
                    .collect();

                lines.push(format!(
                    "  {} {}  {}",
                    Style::Command.paint(&command.name),
                    Style::Muted.paint(&args.join(" ")),
                    Style::Muted.paint(&command.description),
                ));

                for example in &command.examples {
                    lines.push(format!("      {}", Style::Muted.paint(example)));
                }
            }
        }

        lines.join("\n")
    }
}
