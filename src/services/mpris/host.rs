use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use zbus::{Connection, fdo};

use super::{
    EventClock, MediaError, MediaPlayer2PlayerProxy, MediaPlayer2Proxy, PlaybackState,
    PlayerFilter, PlayerId, TrackMetadata, discovery,
};
use crate::{
    config::PlayerConfig,
    tracker::{Clock, HostError, PlaybackController, PlayerStateProvider, RawSnapshot},
};

struct Followed {
    id: PlayerId,
    proxy: MediaPlayer2PlayerProxy<'static>,
}

/// Playback host backed by an MPRIS player on the session bus.
///
/// Follows one player at a time, re-resolving it whenever it leaves the bus,
/// and synthesizes host event timestamps with an [`EventClock`].
pub struct MprisHost {
    connection: Connection,
    filter: PlayerFilter,
    clock: Arc<dyn Clock>,
    followed: Mutex<Option<Followed>>,
    events: Mutex<EventClock>,
}

impl MprisHost {
    /// Connects to the session bus.
    ///
    /// # Errors
    /// Returns `MediaError::InitializationFailed` if the D-Bus connection fails.
    #[instrument(skip_all)]
    pub async fn connect(config: &PlayerConfig, clock: Arc<dyn Clock>) -> Result<Self, MediaError> {
        let connection = Connection::session().await.map_err(|e| {
            MediaError::InitializationFailed(format!("D-Bus connection failed: {e}"))
        })?;

        Ok(Self {
            connection,
            filter: PlayerFilter::new(config.name.clone(), config.ignored_players.clone()),
            clock,
            followed: Mutex::new(None),
            events: Mutex::new(EventClock::new(config.seek_tolerance_ms)),
        })
    }

    /// Whether at least one player that may be followed is on the bus.
    pub async fn is_ready(&self) -> bool {
        match discovery::list_players(&self.connection, &self.filter).await {
            Ok(players) => !players.is_empty(),
            Err(e) => {
                debug!(error = %e, "Failed to list players");
                false
            }
        }
    }

    async fn player_proxy(
        &self,
        player_id: &PlayerId,
    ) -> Result<MediaPlayer2PlayerProxy<'static>, MediaError> {
        MediaPlayer2PlayerProxy::builder(&self.connection)
            .destination(player_id.bus_name().to_string())
            .map_err(MediaError::DbusError)?
            .build()
            .await
            .map_err(MediaError::DbusError)
    }

    /// Keeps following the current player while it is on the bus, otherwise
    /// picks a new one.
    async fn resolve(&self, followed: &mut Option<Followed>) -> Result<(), MediaError> {
        let players = discovery::list_players(&self.connection, &self.filter).await?;

        if let Some(current) = followed.as_ref() {
            if players.contains(&current.id) {
                return Ok(());
            }

            info!(player = %current.id, "Followed player left the bus");
            *followed = None;
            self.events.lock().await.reset();
        }

        let mut candidates = Vec::with_capacity(players.len());
        for id in players {
            let state = match self.player_proxy(&id).await {
                Ok(proxy) => proxy
                    .playback_status()
                    .await
                    .map(|s| PlaybackState::from(s.as_str()))
                    .unwrap_or(PlaybackState::Stopped),
                Err(_) => PlaybackState::Stopped,
            };
            candidates.push((id, state));
        }

        let Some(id) = discovery::pick_player(candidates) else {
            return Ok(());
        };

        let proxy = self.player_proxy(&id).await?;
        let identity = self.identity(&id).await;
        info!(player = %id, identity = %identity, "Following player");

        *followed = Some(Followed { id, proxy });
        Ok(())
    }

    async fn identity(&self, player_id: &PlayerId) -> String {
        let builder = MediaPlayer2Proxy::builder(&self.connection)
            .destination(player_id.bus_name().to_string());

        let identity = match builder {
            Ok(builder) => match builder.build().await {
                Ok(proxy) => proxy.identity().await.ok(),
                Err(_) => None,
            },
            Err(_) => None,
        };

        identity.unwrap_or_else(|| player_id.short_name().to_string())
    }

    async fn sample(
        &self,
        proxy: &MediaPlayer2PlayerProxy<'static>,
    ) -> Result<Option<RawSnapshot>, MediaError> {
        let state = PlaybackState::from(proxy.playback_status().await?.as_str());
        if state == PlaybackState::Stopped {
            return Ok(None);
        }

        let metadata = TrackMetadata::from(proxy.metadata().await?);
        let Some(track_id) = metadata.track_key().map(str::to_string) else {
            return Ok(None);
        };

        let position_ms = match proxy.position().await {
            Ok(micros) => u64::try_from(micros).ok().map(|us| us / 1000),
            Err(zbus::Error::FDO(ref e))
                if matches!(
                    **e,
                    fdo::Error::NotSupported(_) | fdo::Error::UnknownProperty(_)
                ) =>
            {
                None
            }
            Err(e) => return Err(MediaError::DbusError(e)),
        };

        let playing = state == PlaybackState::Playing;
        let now_ms = self.clock.now_ms();
        let timestamp_ms = match position_ms {
            Some(position) => Some(
                self.events
                    .lock()
                    .await
                    .observe(&track_id, playing, position, now_ms),
            ),
            None => None,
        };

        Ok(Some(RawSnapshot {
            track_id: Some(track_id),
            is_paused: Some(!playing),
            position_ms,
            timestamp_ms,
        }))
    }
}

#[async_trait]
impl PlayerStateProvider for MprisHost {
    async fn read(&self) -> Result<Option<RawSnapshot>, HostError> {
        let mut followed = self.followed.lock().await;
        self.resolve(&mut followed).await?;

        let Some(current) = followed.as_ref() else {
            return Ok(None);
        };

        let sampled = self.sample(&current.proxy).await;
        match sampled {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                warn!(player = %current.id, error = %e, "Failed to read player state");
                *followed = None;
                self.events.lock().await.reset();
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl PlaybackController for MprisHost {
    async fn next(&self) -> Result<(), HostError> {
        let followed = self.followed.lock().await;
        let current = followed.as_ref().ok_or(MediaError::NoPlayer)?;

        current
            .proxy
            .next()
            .await
            .map_err(|e| MediaError::ControlFailed(format!("Next failed: {e}")))?;

        Ok(())
    }
}
