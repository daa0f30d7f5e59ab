//! Playback start
//!
//! Consumes a readiness report. A ready asset gets a player, a periodic
//! progress observer and a `play` call; a not-ready asset is left alone, since
//! its failures were already recorded while loading.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::{
    models::{AssetHandle, ReadinessReport},
    player::{MediaPlayer, PlayerFactory},
    Error, Result,
};

/// Outcome of one playback, as seen by the progress observer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSummary {
    /// Number of progress reports logged
    pub progress_reports: u64,
    pub last_position: Duration,
    /// Whether playback reached the end of the item
    pub completed: bool,
}

pub struct PlaybackStarter {
    factory: Arc<dyn PlayerFactory>,
    progress_interval: Duration,
}

impl std::fmt::Debug for PlaybackStarter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackStarter")
            .field("progress_interval", &self.progress_interval)
            .finish()
    }
}

impl PlaybackStarter {
    /// Default interval between progress reports
    pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(5);

    #[must_use]
    pub fn new(factory: Arc<dyn PlayerFactory>, progress_interval: Duration) -> Self {
        Self {
            factory,
            progress_interval,
        }
    }

    /// Start playback of a ready asset.
    ///
    /// Returns `Ok(None)` without constructing a player when the report is not
    /// ready. Fails only if the player item cannot become ready to play.
    pub async fn start(&self, report: &ReadinessReport) -> Result<Option<PlaybackHandle>> {
        if !report.is_ready() {
            debug!(asset = %report.asset.name(), "Asset not ready, playback not started");
            return Ok(None);
        }

        let asset = report.asset.clone();
        let player = self.factory.create(&asset);
        player.ready_to_play().await?;
        info!(asset = %asset.name(), "Player item ready to play");

        let first_report = Instant::now() + self.progress_interval;
        let observer = tokio::spawn(observe_progress(
            asset.clone(),
            Arc::clone(&player),
            first_report,
            self.progress_interval,
        ));
        player.play();

        Ok(Some(PlaybackHandle {
            asset,
            player,
            observer,
        }))
    }
}

async fn observe_progress(
    asset: AssetHandle,
    player: Arc<dyn MediaPlayer>,
    first_report: Instant,
    interval: Duration,
) -> PlaybackSummary {
    let mut ticker = tokio::time::interval_at(first_report, interval);
    let mut finished = player.finished();
    let mut progress_reports = 0;

    loop {
        tokio::select! {
            biased;

            () = &mut finished => {
                info!(asset = %asset.name(), "Video playback finished");
                return PlaybackSummary {
                    progress_reports,
                    last_position: player.position(),
                    completed: true,
                };
            }
            _ = ticker.tick() => {
                let position = player.position();
                if position.is_zero() {
                    continue;
                }
                progress_reports += 1;
                info!(
                    asset = %asset.name(),
                    "{:.0} seconds of video playback elapsed",
                    position.as_secs_f64()
                );
            }
        }
    }
}

/// A running playback
pub struct PlaybackHandle {
    asset: AssetHandle,
    player: Arc<dyn MediaPlayer>,
    observer: JoinHandle<PlaybackSummary>,
}

impl std::fmt::Debug for PlaybackHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackHandle")
            .field("asset", &self.asset)
            .finish_non_exhaustive()
    }
}

impl PlaybackHandle {
    #[must_use]
    pub const fn asset(&self) -> &AssetHandle {
        &self.asset
    }

    #[must_use]
    pub fn position(&self) -> Duration {
        self.player.position()
    }

    /// Wait for playback to reach the end of the item
    pub async fn finished(self) -> Result<PlaybackSummary> {
        self.observer
            .await
            .map_err(|e| Error::Internal(format!("progress observer failed: {e}")))
    }

    /// Stop observing progress and return the position reached
    pub fn stop(self) -> Duration {
        self.observer.abort();
        let position = self.player.position();
        info!(
            asset = %self.asset.name(),
            position_secs = position.as_secs_f64(),
            "Playback stopped"
        );
        position
    }
}
