//! Configuration inspection commands.
mod schema;
mod show;

use std::sync::Arc;

pub use schema::SchemaCommand;
pub use show::ShowCommand;

use crate::{cli::CommandRegistry, config::Config};

/// Registers all configuration-related commands with the command registry.
///
/// # Arguments
///
/// * `registry` - Mutable reference to the command registry
/// * `config` - Effective configuration loaded at startup
pub fn register_commands(registry: &mut CommandRegistry, config: Arc<Config>) {
    const CATEGORY_NAME: &str = "config";

    registry.register_command(CATEGORY_NAME, Box::new(SchemaCommand::new()));
    registry.register_command(CATEGORY_NAME, Box::new(ShowCommand::new(config)));
}
