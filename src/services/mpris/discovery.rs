use zbus::{Connection, fdo};

use super::{MPRIS_BUS_PREFIX, MediaError, PlaybackState, PlayerId};

/// Decides which MPRIS players may be followed.
#[derive(Debug, Clone, Default)]
pub struct PlayerFilter {
    name: Option<String>,
    ignored: Vec<String>,
}

impl PlayerFilter {
    /// Creates a filter.
    ///
    /// # Arguments
    /// * `name` - Optional case-insensitive substring a bus name must contain
    /// * `ignored` - Substrings of bus names that are never followed
    pub fn new(name: Option<String>, ignored: Vec<String>) -> Self {
        Self {
            name: name.map(|n| n.to_lowercase()),
            ignored,
        }
    }

    /// Whether a bus name belongs to a player that may be followed.
    pub fn accepts(&self, bus_name: &str) -> bool {
        if !bus_name.starts_with(MPRIS_BUS_PREFIX) {
            return false;
        }

        if self
            .ignored
            .iter()
            .any(|pattern| bus_name.contains(pattern.as_str()))
        {
            return false;
        }

        match &self.name {
            Some(name) => bus_name.to_lowercase().contains(name.as_str()),
            None => true,
        }
    }
}

/// Lists players on the bus accepted by `filter`, sorted by bus name.
///
/// # Errors
/// Returns `MediaError` if the bus names cannot be listed.
pub async fn list_players(
    connection: &Connection,
    filter: &PlayerFilter,
) -> Result<Vec<PlayerId>, MediaError> {
    let dbus_proxy = fdo::DBusProxy::new(connection)
        .await
        .map_err(|e| MediaError::InitializationFailed(format!("DBus proxy failed: {e}")))?;

    let names = dbus_proxy
        .list_names()
        .await
        .map_err(|e| MediaError::DbusError(e.into()))?;

    let mut players: Vec<PlayerId> = names
        .iter()
        .map(|name| name.as_str())
        .filter(|name| filter.accepts(name))
        .map(PlayerId::from_bus_name)
        .collect();
    players.sort_by(|a, b| a.bus_name().cmp(b.bus_name()));

    Ok(players)
}

/// Picks the player to follow: the first playing one, else the first one.
pub fn pick_player(candidates: Vec<(PlayerId, PlaybackState)>) -> Option<PlayerId> {
    let playing = candidates
        .iter()
        .position(|(_, state)| *state == PlaybackState::Playing);

    let index = playing.unwrap_or(0);
    candidates.into_iter().nth(index).map(|(id, _)| id)
}
