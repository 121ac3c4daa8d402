/// Common reactive primitives
pub mod common;
/// MPRIS media player host
pub mod mpris;

pub use mpris::{MediaError, MprisHost};
