use super::TrackerError;

/// Player state exactly as the host delivered it.
///
/// Every field is optional; [`SnapshotReader`] decides whether the
/// combination is usable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSnapshot {
    /// Identifier of the loaded track
    pub track_id: Option<String>,

    /// Whether playback is paused
    pub is_paused: Option<bool>,

    /// Playback position in milliseconds
    pub position_ms: Option<u64>,

    /// Host event clock in milliseconds
    pub timestamp_ms: Option<u64>,
}

/// A normalized sample of the player's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Identifier of the loaded track
    pub track_id: String,

    /// Whether the track is currently playing
    pub is_playing: bool,

    /// Playback position in milliseconds
    pub position_ms: u64,

    /// Host event clock in milliseconds.
    ///
    /// Only moves when the host registers an event, never with wall time.
    pub timestamp_ms: u64,
}

/// Normalizes raw host state into [`PlayerSnapshot`]s.
pub struct SnapshotReader;

impl SnapshotReader {
    /// Normalizes a raw host snapshot.
    ///
    /// Returns `Ok(None)` when the tracker is disabled, when the host has
    /// nothing loaded, or when the loaded item carries no track identifier.
    ///
    /// # Errors
    /// Returns `TrackerError::DataIntegrity` if a track is loaded but its
    /// pause flag, position or event timestamp is missing.
    pub fn read(
        raw: Option<RawSnapshot>,
        enabled: bool,
    ) -> Result<Option<PlayerSnapshot>, TrackerError> {
        if !enabled {
            return Ok(None);
        }

        let Some(raw) = raw else {
            return Ok(None);
        };

        let track_id = match raw.track_id {
            Some(id) if !id.is_empty() => id,
            _ => return Ok(None),
        };

        let missing = |field: &'static str| TrackerError::DataIntegrity {
            track_id: track_id.clone(),
            missing: field,
        };

        let is_paused = raw.is_paused.ok_or_else(|| missing("pause state"))?;
        let position_ms = raw.position_ms.ok_or_else(|| missing("position"))?;
        let timestamp_ms = raw.timestamp_ms.ok_or_else(|| missing("event timestamp"))?;

        Ok(Some(PlayerSnapshot {
            track_id,
            is_playing: !is_paused,
            position_ms,
            timestamp_ms,
        }))
    }
}
