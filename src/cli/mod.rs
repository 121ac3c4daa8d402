//! Command-line interface for the explored registry and tracking state.
//!
//! Provides a hierarchical command system for inspecting and editing the
//! persisted state the daemon works from. Commands are organized by category
//! and help text is generated from their metadata.

mod commands;
pub mod formatting;
mod registry;
mod service;
mod types;


pub use registry::CommandRegistry;
pub use service::CliService;
pub use types::{CliError, Command, CommandArg, CommandMetadata, CommandResult};
