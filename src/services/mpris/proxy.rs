#![allow(missing_docs)]

use std::collections::HashMap;
use zbus::{Result, proxy, zvariant::OwnedValue};

/// MPRIS MediaPlayer2 interface proxy
///
/// Provides access to the base MPRIS interface of a media player
#[proxy(
    interface = "org.mpris.MediaPlayer2",
    default_service = "org.mpris.MediaPlayer2",
    default_path = "/org/mpris/MediaPlayer2"
)]
pub trait MediaPlayer2 {
    /// Human-readable name of the player
    #[zbus(property)]
    fn identity(&self) -> Result<String>;
}

/// MPRIS MediaPlayer2.Player interface proxy
///
/// Provides access to the playback interface of a media player
#[proxy(
    interface = "org.mpris.MediaPlayer2.Player",
    default_service = "org.mpris.MediaPlayer2",
    default_path = "/org/mpris/MediaPlayer2"
)]
pub trait MediaPlayer2Player {
    /// Skip to next track
    fn next(&self) -> Result<()>;

    /// Current playback status (Playing, Paused, Stopped)
    #[zbus(property)]
    fn playback_status(&self) -> Result<String>;

    /// Current track metadata
    #[zbus(property)]
    fn metadata(&self) -> Result<HashMap<String, OwnedValue>>;

    /// Current playback position in microseconds.
    ///
    /// Players never signal position changes, so the value is never cached.
    #[zbus(property(emits_changed_signal = "false"))]
    fn position(&self) -> Result<i64>;
}
