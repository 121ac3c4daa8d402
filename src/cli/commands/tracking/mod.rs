//! Tracking toggle commands.
mod status;
mod toggle;

use std::sync::Arc;

pub use status::StatusCommand;
pub use toggle::{DisableCommand, EnableCommand};

use crate::{cli::CommandRegistry, tracker::PersistenceStore};

/// Registers all tracking-related commands with the command registry.
///
/// A running daemon picks up the persisted flag through its state file
/// watcher.
pub fn register_commands(registry: &mut CommandRegistry, store: Arc<dyn PersistenceStore>) {
    const CATEGORY_NAME: &str = "tracking";

    registry.register_command(CATEGORY_NAME, Box::new(EnableCommand::new(store.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(DisableCommand::new(store.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(StatusCommand::new(store)));
}
