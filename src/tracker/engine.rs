use std::{future::Future, sync::Arc, time::Duration};

use tokio::sync::watch;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::config::Config;

use super::{
    Advance, Backoff, Clock, DiscoveryGate, EnabledFlag, ExploredRegistry, PersistenceStore,
    PlaybackController, PlayerStateProvider, ProgressAccumulator, SkipController, SnapshotReader,
    TrackerError, readiness,
};

/// Timing parameters of the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerSettings {
    /// Listening time after which a track counts as explored
    pub threshold_ms: u64,
    /// Sleep between two cycles
    pub poll_interval: Duration,
    /// Retry policy while waiting for the host
    pub readiness_backoff: Backoff,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for TrackerSettings {
    fn from(config: &Config) -> Self {
        Self {
            threshold_ms: config.tracker.threshold_ms,
            poll_interval: Duration::from_millis(config.tracker.poll_interval_ms),
            readiness_backoff: Backoff::new(
                Duration::from_millis(config.player.initial_backoff_ms),
                Duration::from_millis(config.player.max_backoff_ms),
            ),
        }
    }
}

/// Collaborators the tracker drives.
pub struct TrackerHost {
    /// Source of player state
    pub provider: Arc<dyn PlayerStateProvider>,
    /// Receiver of skip commands
    pub controller: Arc<dyn PlaybackController>,
    /// Persistence for the explored registry
    pub store: Arc<dyn PersistenceStore>,
    /// Global on/off switch
    pub enabled: Arc<dyn EnabledFlag>,
    /// Wall clock
    pub clock: Arc<dyn Clock>,
}

/// Outcome of one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// What the accumulator decided
    pub advance: Advance,
    /// Whether the entered track was skipped
    pub skipped: bool,
}

/// The polling loop.
///
/// Owns all loop state: the previous sample, the progress of the current
/// session and the explored registry. Nothing else mutates them.
pub struct Tracker {
    settings: TrackerSettings,
    provider: Arc<dyn PlayerStateProvider>,
    enabled: Arc<dyn EnabledFlag>,
    clock: Arc<dyn Clock>,
    accumulator: ProgressAccumulator,
    gate: DiscoveryGate,
    skip: SkipController,
    external_changes: Option<watch::Receiver<u64>>,
}

impl Tracker {
    /// Creates a tracker, loading the explored registry from the host store.
    pub fn new(settings: TrackerSettings, host: TrackerHost) -> Self {
        Self {
            settings,
            provider: host.provider,
            enabled: host.enabled,
            clock: host.clock,
            accumulator: ProgressAccumulator::new(settings.threshold_ms),
            gate: DiscoveryGate::load(host.store),
            skip: SkipController::new(host.controller),
            external_changes: None,
        }
    }

    /// Reloads the registry whenever `changes` ticks.
    ///
    /// Used to pick up registry edits made by other processes.
    pub fn with_external_changes(mut self, changes: watch::Receiver<u64>) -> Self {
        self.external_changes = Some(changes);
        self
    }

    /// Current loop state.
    pub fn accumulator(&self) -> &ProgressAccumulator {
        &self.accumulator
    }

    /// Current explored registry.
    pub fn registry(&self) -> &ExploredRegistry {
        self.gate.registry()
    }

    /// Runs one poll cycle.
    ///
    /// Returns `Ok(None)` when the host could not be polled; loop state is
    /// left untouched in that case.
    ///
    /// # Errors
    /// Returns `TrackerError::DataIntegrity` if the host reports a loaded
    /// track with incomplete state.
    pub async fn cycle(&mut self) -> Result<Option<CycleReport>, TrackerError> {
        self.apply_external_changes();

        let raw = match self.provider.read().await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Player poll failed, skipping cycle");
                return Ok(None);
            }
        };

        let current = SnapshotReader::read(raw, self.enabled.is_enabled())?;
        let now_ms = self.clock.now_ms();
        let advance = self.accumulator.advance(current, now_ms);

        trace!(
            kind = %advance.kind,
            committed_ms = advance.committed_ms,
            total_ms = self.accumulator.progress().total_accrued_ms,
            rough_ms = self.accumulator.progress().rough_accrued_ms,
            "Cycle"
        );

        if let Some(track_id) = advance.discovered.as_deref() {
            self.gate.mark(track_id);
        }

        let mut skipped = false;
        if let Some(track_id) = advance.entered.as_deref() {
            debug!(track_id, "Now following track");

            if self.gate.registry().contains(track_id) {
                self.skip.skip_next(track_id).await;
                skipped = true;
            }
        }

        Ok(Some(CycleReport { advance, skipped }))
    }

    /// Waits for the host, then polls until a fatal error occurs.
    ///
    /// # Errors
    /// Returns the fatal `TrackerError` that stopped the loop.
    #[instrument(skip_all)]
    pub async fn run<F, Fut>(mut self, probe: F) -> Result<(), TrackerError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        readiness::wait_until_ready(probe, self.settings.readiness_backoff).await;
        info!(
            poll_interval_ms = self.settings.poll_interval.as_millis() as u64,
            "Tracking started"
        );

        loop {
            if let Err(e) = self.cycle().await {
                error!(error = %e, "Tracking stopped");
                return Err(e);
            }

            tokio::time::sleep(self.settings.poll_interval).await;
        }
    }

    fn apply_external_changes(&mut self) {
        let Some(changes) = self.external_changes.as_mut() else {
            return;
        };

        if changes.has_changed().unwrap_or(false) {
            let _ = changes.borrow_and_update();
            self.gate.reload();
        }
    }
}
