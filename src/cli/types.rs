use async_trait::async_trait;
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during CLI command execution.
///
/// This enum represents all possible error conditions in the CLI system,
/// from command discovery failures to execution errors. Each variant provides
/// contextual information to help users understand what went wrong.
#[derive(Error, Debug)]
pub enum CliError {
    /// A command or category was not found in the registry.
    ///
    /// This occurs when users specify a command that doesn't exist, either
    /// because the category is invalid or the command name is wrong within
    /// a valid category.
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Invalid arguments were provided to a command.
    ///
    /// Returned when argument count validation fails or an argument names
    /// something that does not exist, such as a track that was never explored.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The configuration could not be rendered.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The state file could not be read or written.
    #[error("State error: {0}")]
    Store(#[from] StoreError),
}

/// Type alias for command execution results.
///
/// All CLI commands return this type, providing either a success message
/// as a String or a CliError describing what went wrong.
pub type CommandResult = Result<String, CliError>;

/// Specification for a single command argument.
#[derive(Debug, Clone)]
pub struct CommandArg {
    /// The name of the argument (e.g., "track-id").
    pub name: String,

    /// Human-readable description of what this argument does.
    pub description: String,

    /// Whether this argument is required for command execution.
    pub required: bool,
}

/// Complete metadata for a CLI command.
///
/// This struct serves as the single source of truth for everything about
/// a command: its identity, arguments, usage examples, and categorization.
/// The CLI system uses this metadata for help generation, argument validation,
/// and command discovery.
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    /// The command name (e.g., "list", "forget", "status").
    pub name: String,

    /// Brief description of what this command does.
    pub description: String,

    /// Specification of all arguments this command accepts.
    pub args: Vec<CommandArg>,

    /// Example usage strings to show in help text.
    pub examples: Vec<String>,

    /// Category this command belongs to (e.g., "registry", "tracking").
    pub category: String,
}

/// Trait defining the interface for all CLI commands.
///
/// All commands implement this trait to provide consistent execution
/// and metadata discovery. Commands receive dependencies through
/// their constructors.
#[async_trait]
pub trait Command: Send + Sync {
    /// Executes the command with the provided arguments.
    ///
    /// The registry has already validated the argument count against the
    /// command's metadata.
    ///
    /// # Errors
    ///
    /// Returns `CliError` for any execution failures, including:
    /// - Arguments naming something that does not exist
    /// - State file read or write failures
    async fn execute(&self, args: &[String]) -> CommandResult;

    /// Returns the complete metadata for this command.
    fn metadata(&self) -> CommandMetadata;
}
