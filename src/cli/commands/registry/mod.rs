//! Explored registry commands.
mod forget;
mod list;
mod reset;

use std::sync::Arc;

pub use forget::ForgetCommand;
pub use list::ListCommand;
pub use reset::ResetCommand;

use crate::{cli::CommandRegistry, tracker::PersistenceStore};

/// Registers all registry-related commands with the command registry.
///
/// # Arguments
///
/// * `registry` - Mutable reference to the command registry
/// * `store` - State store holding the explored registry
pub fn register_commands(registry: &mut CommandRegistry, store: Arc<dyn PersistenceStore>) {
    const CATEGORY_NAME: &str = "registry";

    registry.register_command(CATEGORY_NAME, Box::new(ListCommand::new(store.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(ForgetCommand::new(store.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(ResetCommand::new(store)));
}
