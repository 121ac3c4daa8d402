use thiserror::Error;

/// Fatal tracker errors.
///
/// Anything in here stops the polling loop for good.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackerError {
    /// The host reported a loaded track without its full playback state
    #[error("host reported track '{track_id}' without {missing}")]
    DataIntegrity {
        /// Track the host reported as loaded
        track_id: String,
        /// Name of the missing field
        missing: &'static str,
    },
}
