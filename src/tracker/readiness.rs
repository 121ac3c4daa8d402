use std::{future::Future, time::Duration};

use tracing::{debug, info};

/// Capped exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
}

impl Backoff {
    /// Creates a backoff that starts at `initial` and doubles up to `max`.
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max: max.max(initial),
        }
    }

    /// Delay to wait after the given failed attempt (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.initial.saturating_mul(factor).min(self.max)
    }
}

/// Waits until `probe` reports the host as ready.
///
/// Called once before the polling loop starts. Retries forever; returns the
/// number of attempts it took.
pub async fn wait_until_ready<F, Fut>(mut probe: F, backoff: Backoff) -> u32
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let mut attempt = 1;

    loop {
        if probe().await {
            info!(attempts = attempt, "Playback host ready");
            return attempt;
        }

        let delay = backoff.delay(attempt);
        debug!(attempt, delay_ms = delay.as_millis() as u64, "Playback host not ready");
        tokio::time::sleep(delay).await;
        attempt = attempt.saturating_add(1);
    }
}
