use crate::tracker::HostError;

/// Errors that can occur while talking to MPRIS players
#[derive(thiserror::Error, Debug)]
pub enum MediaError {
    /// No player on the bus matches the configuration
    #[error("No matching media player on the session bus")]
    NoPlayer,

    /// D-Bus communication error
    #[error("D-Bus operation failed: {0}")]
    DbusError(#[from] zbus::Error),

    /// Failed to initialize the media service
    #[error("Failed to initialize media service: {0}")]
    InitializationFailed(String),

    /// Failed to control the player
    #[error("Failed to control player: {0}")]
    ControlFailed(String),
}

impl From<MediaError> for HostError {
    fn from(error: MediaError) -> Self {
        match error {
            MediaError::NoPlayer | MediaError::InitializationFailed(_) => {
                HostError::Unavailable(error.to_string())
            }
            MediaError::DbusError(_) | MediaError::ControlFailed(_) => {
                HostError::CallFailed(error.to_string())
            }
        }
    }
}
