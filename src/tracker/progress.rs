use super::{PlayerSnapshot, Transition, TransitionKind};

/// Listening progress for the track currently being followed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackProgressState {
    /// Listening time confirmed by host events.
    ///
    /// Never decreases while the same track stays loaded.
    pub total_accrued_ms: u64,

    /// Provisional time since the last host event.
    ///
    /// Overwritten on every same-state cycle, folded into the total only
    /// when playback stops without a successor timestamp.
    pub rough_accrued_ms: u64,

    /// Discovery already fired for this session.
    pub already_marked: bool,
}

impl TrackProgressState {
    /// Committed plus provisional progress.
    pub fn estimated_ms(&self) -> u64 {
        self.total_accrued_ms.saturating_add(self.rough_accrued_ms)
    }

    fn commit(&mut self, interval_ms: u64) -> u64 {
        self.total_accrued_ms = self.total_accrued_ms.saturating_add(interval_ms);
        self.rough_accrued_ms = 0;
        interval_ms
    }
}

/// What a single cycle decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    /// How the interval was classified
    pub kind: TransitionKind,

    /// Listening time folded into the total this cycle, before any reset
    pub committed_ms: u64,

    /// Track whose progress just crossed the threshold
    pub discovered: Option<String>,

    /// Track that was just entered on a track change
    pub entered: Option<String>,
}

/// Carries loop state from one cycle to the next.
///
/// Owns the previous sample and the progress of the current session. Each
/// call to [`advance`](Self::advance) consumes one new sample.
#[derive(Debug, Clone)]
pub struct ProgressAccumulator {
    threshold_ms: u64,
    previous: Option<PlayerSnapshot>,
    progress: TrackProgressState,
}

impl ProgressAccumulator {
    /// Creates an accumulator with nothing tracked yet.
    pub fn new(threshold_ms: u64) -> Self {
        Self {
            threshold_ms,
            previous: None,
            progress: TrackProgressState::default(),
        }
    }

    /// Progress of the current session.
    pub fn progress(&self) -> &TrackProgressState {
        &self.progress
    }

    /// Sample consumed by the last cycle.
    pub fn previous(&self) -> Option<&PlayerSnapshot> {
        self.previous.as_ref()
    }

    /// Discovery threshold in milliseconds.
    pub fn threshold_ms(&self) -> u64 {
        self.threshold_ms
    }

    /// Consumes one sample taken at wall time `now_ms`.
    ///
    /// Time between two host events is committed from the host's own
    /// timestamps. Between events only a provisional estimate against the
    /// wall clock is kept, so no interval is ever counted twice.
    pub fn advance(&mut self, current: Option<PlayerSnapshot>, now_ms: u64) -> Advance {
        let transition = Transition::classify(self.previous.as_ref(), current.as_ref());
        let mut discovered = None;
        let mut committed_ms = 0;

        if let Some(prev) = self.previous.as_ref().filter(|p| p.is_playing) {
            if !self.progress.already_marked {
                if transition.same_state {
                    self.progress.rough_accrued_ms = now_ms.saturating_sub(prev.timestamp_ms);
                } else {
                    let interval = match current.as_ref() {
                        Some(cur) => cur.timestamp_ms.saturating_sub(prev.timestamp_ms),
                        None => self.progress.rough_accrued_ms,
                    };
                    committed_ms = self.progress.commit(interval);
                }

                if self.progress.estimated_ms() >= self.threshold_ms {
                    self.progress.already_marked = true;
                    discovered = Some(prev.track_id.clone());
                }
            }
        }

        let mut entered = None;
        if transition.track_changed {
            self.progress = TrackProgressState::default();
            entered = current.as_ref().map(|s| s.track_id.clone());
        }

        self.previous = current;

        Advance {
            kind: transition.kind(),
            committed_ms,
            discovered,
            entered,
        }
    }
}
