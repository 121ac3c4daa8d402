/// Synthesized event timestamps for MPRIS players.
///
/// MPRIS reports position but no event time. The clock remembers the last
/// sample and issues a fresh stamp whenever something happened since: the
/// track or the play state changed, or the position moved away from where
/// steady playback would have put it. Otherwise the previous stamp is
/// repeated.
#[derive(Debug, Clone)]
pub struct EventClock {
    seek_tolerance_ms: u64,
    last: Option<Observation>,
}

#[derive(Debug, Clone)]
struct Observation {
    track_id: String,
    playing: bool,
    position_ms: u64,
    sampled_ms: u64,
    stamp_ms: u64,
}

impl EventClock {
    /// Creates a clock that treats position jumps above `seek_tolerance_ms`
    /// as events.
    pub fn new(seek_tolerance_ms: u64) -> Self {
        Self {
            seek_tolerance_ms,
            last: None,
        }
    }

    /// Forgets the last observation so the next sample gets a fresh stamp.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Records a sample taken at `now_ms` and returns its event stamp.
    pub fn observe(&mut self, track_id: &str, playing: bool, position_ms: u64, now_ms: u64) -> u64 {
        let stamp_ms = match &self.last {
            Some(last) if !self.is_event(last, track_id, playing, position_ms, now_ms) => {
                last.stamp_ms
            }
            Some(last) => now_ms.max(last.stamp_ms.saturating_add(1)),
            None => now_ms,
        };

        self.last = Some(Observation {
            track_id: track_id.to_string(),
            playing,
            position_ms,
            sampled_ms: now_ms,
            stamp_ms,
        });

        stamp_ms
    }

    fn is_event(
        &self,
        last: &Observation,
        track_id: &str,
        playing: bool,
        position_ms: u64,
        now_ms: u64,
    ) -> bool {
        if last.track_id != track_id || last.playing != playing {
            return true;
        }

        let expected_ms = if playing {
            last.position_ms
                .saturating_add(now_ms.saturating_sub(last.sampled_ms))
        } else {
            last.position_ms
        };

        position_ms.abs_diff(expected_ms) > self.seek_tolerance_ms
    }
}
