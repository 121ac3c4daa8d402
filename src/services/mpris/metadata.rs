use std::collections::HashMap;

use zbus::zvariant::{ObjectPath, OwnedValue};

/// Track id MPRIS players report when nothing is loaded.
pub const NO_TRACK_PATH: &str = "/org/mpris/MediaPlayer2/TrackList/NoTrack";

/// Metadata for the loaded track
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackMetadata {
    /// Location of the track, e.g. `https://open.spotify.com/track/...`
    pub url: Option<String>,

    /// MPRIS track object path
    pub track_id: Option<String>,
}

impl TrackMetadata {
    /// Stable identifier for the loaded track.
    ///
    /// Prefers the track URL, which survives player restarts, over the
    /// player-local object path. Returns `None` when nothing is loaded.
    pub fn track_key(&self) -> Option<&str> {
        let url = self.url.as_deref().filter(|url| !url.is_empty());
        let track_id = self
            .track_id
            .as_deref()
            .filter(|id| !id.is_empty() && *id != NO_TRACK_PATH);

        url.or(track_id)
    }
}

impl From<HashMap<String, OwnedValue>> for TrackMetadata {
    fn from(metadata: HashMap<String, OwnedValue>) -> Self {
        let mut track = Self::default();

        if let Some(url) = metadata.get("xesam:url") {
            if let Ok(url_str) = url.downcast_ref::<String>() {
                track.url = Some(url_str);
            }
        }

        if let Some(track_id) = metadata.get("mpris:trackid") {
            if let Ok(path) = track_id.downcast_ref::<ObjectPath<'_>>() {
                track.track_id = Some(path.to_string());
            } else if let Ok(id_str) = track_id.downcast_ref::<String>() {
                track.track_id = Some(id_str);
            }
        }

        track
    }
}
