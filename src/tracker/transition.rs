use std::fmt;

use super::PlayerSnapshot;

/// Classification of the interval between two consecutive samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Both samples carry the same host event timestamp.
    ///
    /// Only the wall clock moved since the previous cycle.
    pub same_state: bool,

    /// The loaded track differs, with "nothing loaded" as its own identity.
    pub track_changed: bool,

    /// Nothing is loaded in the current sample.
    pub stopped: bool,
}

/// Coarse label for a [`Transition`], used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// No host event since the previous cycle
    SameState,
    /// Host event on the same track (tick, pause, resume, seek)
    Advance,
    /// A different track is loaded
    TrackChange,
    /// Nothing is loaded anymore, or still nothing is loaded
    Stopped,
}

impl Transition {
    /// Classifies the step from `previous` to `current`.
    pub fn classify(previous: Option<&PlayerSnapshot>, current: Option<&PlayerSnapshot>) -> Self {
        let same_state = match (previous, current) {
            (Some(prev), Some(cur)) => prev.timestamp_ms == cur.timestamp_ms,
            _ => false,
        };

        let track_changed =
            previous.map(|s| s.track_id.as_str()) != current.map(|s| s.track_id.as_str());

        Self {
            same_state,
            track_changed,
            stopped: current.is_none(),
        }
    }

    /// Collapses the flags into a single label.
    pub fn kind(&self) -> TransitionKind {
        if self.stopped {
            TransitionKind::Stopped
        } else if self.track_changed {
            TransitionKind::TrackChange
        } else if self.same_state {
            TransitionKind::SameState
        } else {
            TransitionKind::Advance
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionKind::SameState => write!(f, "same-state"),
            TransitionKind::Advance => write!(f, "advance"),
            TransitionKind::TrackChange => write!(f, "track-change"),
            TransitionKind::Stopped => write!(f, "stopped"),
        }
    }
}
