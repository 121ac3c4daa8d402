use tracing::warn;

use crate::{services::common::Property, store::StoreError};

use super::{EnabledFlag, PersistenceStore};

/// Store key holding the tracking enabled flag.
pub const ENABLED_KEY: &str = "explored.enabled";

/// Reads the persisted enabled flag.
///
/// Tracking is enabled unless the store says otherwise. Unrecognized values
/// are logged and treated as enabled.
pub fn load_enabled(store: &dyn PersistenceStore) -> bool {
    match store.get(ENABLED_KEY).as_deref() {
        None | Some("true") => true,
        Some("false") => false,
        Some(other) => {
            warn!(value = other, "Invalid enabled flag in store, assuming enabled");
            true
        }
    }
}

/// Persists the enabled flag.
///
/// # Errors
/// Returns `StoreError` if the flag could not be written.
pub fn save_enabled(store: &dyn PersistenceStore, enabled: bool) -> Result<(), StoreError> {
    store.set(ENABLED_KEY, enabled.to_string())
}

impl EnabledFlag for Property<bool> {
    fn is_enabled(&self) -> bool {
        self.get()
    }
}
