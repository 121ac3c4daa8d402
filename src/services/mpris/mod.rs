//! MPRIS playback host.
//!
//! Implements the tracker's host interfaces on top of the MPRIS D-Bus
//! protocol: player state is sampled on demand, event timestamps are
//! synthesized from position jumps and state changes, and skips are sent as
//! `Next` calls.

/// Player selection on the session bus
pub mod discovery;
/// Media player error types
pub mod error;
/// Synthesized host event timestamps
pub mod event_clock;
/// Tracker host implementation
pub mod host;
/// Track metadata types
pub mod metadata;
/// D-Bus proxy trait definitions
pub mod proxy;
/// Player identifiers and playback state
pub mod types;

pub use discovery::{PlayerFilter, pick_player};
pub use error::*;
pub use event_clock::EventClock;
pub use host::MprisHost;
pub use metadata::*;
pub use proxy::*;
pub use types::*;
