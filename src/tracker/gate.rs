use std::sync::Arc;

use tracing::{error, info, instrument};

use super::{ExploredRegistry, PersistenceStore};

/// Records discoveries in the explored registry.
pub struct DiscoveryGate {
    registry: ExploredRegistry,
    store: Arc<dyn PersistenceStore>,
}

impl DiscoveryGate {
    /// Creates a gate over a registry loaded from `store`.
    pub fn load(store: Arc<dyn PersistenceStore>) -> Self {
        let registry = ExploredRegistry::load(store.as_ref());
        info!(explored = registry.len(), "Loaded explored registry");
        Self { registry, store }
    }

    /// Marks `track_id` as explored and persists the registry.
    ///
    /// The stored registry is re-read first, so edits made by other processes
    /// since the last reload are kept. Marking a track that is already
    /// explored writes nothing. Returns whether the track was newly added.
    #[instrument(skip(self))]
    pub fn mark(&mut self, track_id: &str) -> bool {
        let mut added = false;
        let updated = ExploredRegistry::update(self.store.as_ref(), |registry| {
            added = registry.insert(track_id);
            added
        });

        match updated {
            Ok(registry) => self.registry = registry,
            Err(e) => {
                error!(error = %e, "Failed to persist explored registry");
                added = self.registry.insert(track_id);
            }
        }

        if added {
            info!(explored = self.registry.len(), "Track discovered");
        }

        added
    }

    /// Replaces the in-memory registry with the stored one.
    pub fn reload(&mut self) {
        self.registry = ExploredRegistry::load(self.store.as_ref());
        info!(explored = self.registry.len(), "Reloaded explored registry");
    }

    /// The current registry.
    pub fn registry(&self) -> &ExploredRegistry {
        &self.registry
    }
}
