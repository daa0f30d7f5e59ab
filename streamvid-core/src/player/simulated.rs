//! Simulated media player
//!
//! Playback position advances with the tokio clock from the moment `play` is
//! called and stops at the configured media duration.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::debug;

use super::{MediaPlayer, PlayerError, PlayerFactory};
use crate::config::SimulationConfig;
use crate::models::{AssetHandle, MediaDuration};

pub struct SimulatedPlayer {
    asset: AssetHandle,
    duration: MediaDuration,
    prepare_delay: Duration,
    fail_prepare: bool,
    started: watch::Sender<Option<Instant>>,
}

impl SimulatedPlayer {
    #[must_use]
    pub fn new(
        asset: AssetHandle,
        duration: MediaDuration,
        prepare_delay: Duration,
        fail_prepare: bool,
    ) -> Self {
        Self {
            asset,
            duration,
            prepare_delay,
            fail_prepare,
            started: watch::channel(None).0,
        }
    }

    #[must_use]
    pub const fn asset(&self) -> &AssetHandle {
        &self.asset
    }
}

#[async_trait]
impl MediaPlayer for SimulatedPlayer {
    async fn ready_to_play(&self) -> Result<(), PlayerError> {
        tokio::time::sleep(self.prepare_delay).await;
        if self.fail_prepare {
            return Err(PlayerError::ItemFailed(format!(
                "simulated item failure for {}",
                self.asset.name()
            )));
        }
        Ok(())
    }

    fn play(&self) {
        let started = self.started.send_if_modified(|started| {
            if started.is_some() {
                return false;
            }
            *started = Some(Instant::now());
            true
        });
        if started {
            debug!(asset = %self.asset.name(), "Simulated playback started");
        }
    }

    fn position(&self) -> Duration {
        let Some(started) = *self.started.borrow() else {
            return Duration::ZERO;
        };
        let elapsed = started.elapsed();
        match self.duration {
            MediaDuration::Finite(total) => elapsed.min(total),
            MediaDuration::Indefinite => elapsed,
        }
    }

    async fn finished(&self) {
        let MediaDuration::Finite(total) = self.duration else {
            return std::future::pending().await;
        };

        let mut rx = self.started.subscribe();
        let started = match rx.wait_for(Option::is_some).await {
            Ok(started) => *started,
            Err(_) => None,
        };
        match started {
            Some(started) => tokio::time::sleep_until(started + total).await,
            None => std::future::pending().await,
        }
    }
}

/// Builds [`SimulatedPlayer`]s from the simulation settings
#[derive(Debug, Clone)]
pub struct SimulatedPlayerFactory {
    duration: MediaDuration,
    prepare_delay: Duration,
    fail_prepare: bool,
}

impl SimulatedPlayerFactory {
    #[must_use]
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            duration: config.media_duration(),
            prepare_delay: Duration::from_millis(config.prepare_delay_ms),
            fail_prepare: config.fail_prepare,
        }
    }
}

impl PlayerFactory for SimulatedPlayerFactory {
    fn create(&self, asset: &AssetHandle) -> Arc<dyn MediaPlayer> {
        Arc::new(SimulatedPlayer::new(
            asset.clone(),
            self.duration,
            self.prepare_delay,
            self.fail_prepare,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(duration: MediaDuration) -> SimulatedPlayer {
        SimulatedPlayer::new(
            AssetHandle::parse("https://example.com/vod/master.m3u8").unwrap(),
            duration,
            Duration::from_millis(200),
            false,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_position_advances_after_play() {
        let player = player(MediaDuration::Finite(Duration::from_secs(10)));
        player.ready_to_play().await.unwrap();
        assert_eq!(player.position(), Duration::ZERO);

        player.play();
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(player.position(), Duration::from_secs(4));

        // Position is clamped to the media duration
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(player.position(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_at_end_of_item() {
        let player = player(MediaDuration::Finite(Duration::from_secs(10)));
        player.play();
        let start = Instant::now();

        player.finished().await;
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_never_finishes() {
        let player = player(MediaDuration::Indefinite);
        player.play();

        let finished =
            tokio::time::timeout(Duration::from_secs(3600), player.finished()).await;
        assert!(finished.is_err());
        assert_eq!(player.position(), Duration::from_secs(3600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_prepare_failure() {
        let asset = AssetHandle::parse("https://example.com/vod/master.m3u8").unwrap();
        let factory = SimulatedPlayerFactory::new(&SimulationConfig {
            fail_prepare: true,
            ..SimulationConfig::default()
        });

        let player = factory.create(&asset);
        assert!(matches!(
            player.ready_to_play().await,
            Err(PlayerError::ItemFailed(_))
        ));
    }
}
