//! Listening progress accrual and discovery.
//!
//! The tracker polls the playback host at a fixed interval and rebuilds a
//! continuous measure of listening time from coarse samples. Time between
//! two host events is committed from the host's own event timestamps; while
//! no event arrives, a provisional estimate against the wall clock lets the
//! threshold fire without waiting for the next event.
//!
//! Once a track has been listened to for the threshold it is recorded in the
//! [`ExploredRegistry`], and whenever playback later moves onto an explored
//! track the host is asked to skip it.
//!
//! ```text
//! PlayerStateProvider -> SnapshotReader -> Transition -> ProgressAccumulator
//!                                                         |            |
//!                                                  DiscoveryGate  SkipController
//! ```

mod clock;
mod engine;
mod error;
mod flag;
mod gate;
mod progress;
mod readiness;
mod registry;
mod skip;
mod snapshot;
mod traits;
mod transition;

pub use clock::SystemClock;
pub use engine::{CycleReport, Tracker, TrackerHost, TrackerSettings};
pub use error::TrackerError;
pub use flag::{ENABLED_KEY, load_enabled, save_enabled};
pub use gate::DiscoveryGate;
pub use progress::{Advance, ProgressAccumulator, TrackProgressState};
pub use readiness::{Backoff, wait_until_ready};
pub use registry::{EXPLORED_TRACKS_KEY, ExploredRegistry};
pub use skip::SkipController;
pub use snapshot::{PlayerSnapshot, RawSnapshot, SnapshotReader};
pub use traits::{
    Clock, EnabledFlag, HostError, PersistenceStore, PlaybackController, PlayerStateProvider,
};
pub use transition::{Transition, TransitionKind};

#[cfg(test)]
mod tests;
