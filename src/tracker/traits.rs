use async_trait::async_trait;
use thiserror::Error;

use crate::store::StoreError;

use super::RawSnapshot;

/// Failure of a call into the playback host.
///
/// Host failures are never fatal to the tracker: a failed poll skips the
/// cycle and a failed skip is dropped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    /// The host could not be reached at all
    #[error("host unavailable: {0}")]
    Unavailable(String),

    /// The host was reached but the call failed
    #[error("host call failed: {0}")]
    CallFailed(String),
}

/// Source of raw player state.
#[async_trait]
pub trait PlayerStateProvider: Send + Sync {
    /// Reads the player's current state.
    ///
    /// Returns `Ok(None)` when nothing is loaded.
    ///
    /// # Errors
    /// Returns `HostError` if the host could not be queried.
    async fn read(&self) -> Result<Option<RawSnapshot>, HostError>;
}

/// Issues playback commands to the host.
#[async_trait]
pub trait PlaybackController: Send + Sync {
    /// Advances to the next track.
    ///
    /// # Errors
    /// Returns `HostError` if the command could not be delivered.
    async fn next(&self) -> Result<(), HostError>;
}

/// String key/value persistence.
pub trait PersistenceStore: Send + Sync {
    /// Returns the stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key` and persists it before returning.
    ///
    /// # Errors
    /// Returns `StoreError` if the value could not be persisted.
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Rewrites the value under `key` from its latest stored version.
    ///
    /// `apply` receives the current value and returns the replacement, or
    /// `None` to leave it untouched. Stores shared between processes read
    /// the persisted value rather than a cached one and keep other writers
    /// out until the replacement is persisted.
    ///
    /// # Errors
    /// Returns `StoreError` if `apply` fails or the value could not be persisted.
    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<&str>) -> Result<Option<String>, StoreError>,
    ) -> Result<(), StoreError> {
        match apply(self.get(key).as_deref())? {
            Some(value) => self.set(key, value),
            None => Ok(()),
        }
    }
}

/// Externally toggleable gate for the whole tracker.
pub trait EnabledFlag: Send + Sync {
    /// Whether progress tracking is currently enabled.
    fn is_enabled(&self) -> bool;
}

/// Monotonic clock in milliseconds.
pub trait Clock: Send + Sync {
    /// Milliseconds since a fixed origin; never decreases.
    fn now_ms(&self) -> u64;
}
