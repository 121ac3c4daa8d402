use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::store::StoreError;

use super::PersistenceStore;

/// Store key holding the explored track ids as a JSON array.
pub const EXPLORED_TRACKS_KEY: &str = "explored.tracks";

/// Set of track ids that have already been listened to long enough.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExploredRegistry {
    tracks: BTreeSet<String>,
}

impl ExploredRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the registry from the store.
    ///
    /// A missing entry yields an empty registry; so does an entry that is not
    /// a JSON array of strings, after logging a warning.
    pub fn load(store: &dyn PersistenceStore) -> Self {
        Self::parse(store.get(EXPLORED_TRACKS_KEY).as_deref())
    }

    /// Applies `change` to the latest stored registry and returns the result.
    ///
    /// The registry is written back only when `change` returns `true`, and no
    /// other writer can slip in between the read and the write.
    ///
    /// # Errors
    /// Returns `StoreError` if the list cannot be encoded or persisted.
    pub fn update(
        store: &dyn PersistenceStore,
        change: impl FnOnce(&mut Self) -> bool,
    ) -> Result<Self, StoreError> {
        let mut change = Some(change);
        let mut latest = Self::new();

        store.update(EXPLORED_TRACKS_KEY, &mut |stored| {
            latest = Self::parse(stored);
            let changed = change.take().is_some_and(|change| change(&mut latest));
            if changed {
                latest.encode().map(Some)
            } else {
                Ok(None)
            }
        })?;

        Ok(latest)
    }

    fn parse(stored: Option<&str>) -> Self {
        let Some(content) = stored else {
            debug!("No explored tracks stored yet");
            return Self::new();
        };

        match serde_json::from_str::<Vec<String>>(content) {
            Ok(tracks) => Self {
                tracks: tracks.into_iter().collect(),
            },
            Err(e) => {
                warn!(error = %e, "Invalid explored track list in store, starting empty");
                Self::new()
            }
        }
    }

    fn encode(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(&self.tracks)?)
    }

    /// Whether `track_id` has been explored.
    pub fn contains(&self, track_id: &str) -> bool {
        self.tracks.contains(track_id)
    }

    /// Adds `track_id`, returning `false` if it was already present.
    pub fn insert(&mut self, track_id: impl Into<String>) -> bool {
        self.tracks.insert(track_id.into())
    }

    /// Removes `track_id`, returning `false` if it was not present.
    pub fn remove(&mut self, track_id: &str) -> bool {
        self.tracks.remove(track_id)
    }

    /// Forgets every explored track.
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Number of explored tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether no track has been explored yet.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Explored track ids in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tracks.iter().map(String::as_str)
    }
}
