//! Simulated asset loader
//!
//! Resolves tracks and duration from configuration after a fixed delay on the
//! tokio clock, optionally failing either property.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{AssetLoader, LoaderError};
use crate::config::SimulationConfig;
use crate::models::{AssetHandle, MediaDuration, TrackInfo};

#[derive(Debug, Clone)]
pub struct SimulatedAssetLoader {
    tracks: Vec<TrackInfo>,
    duration: MediaDuration,
    tracks_delay: Duration,
    duration_delay: Duration,
    fail_tracks: bool,
    fail_duration: bool,
}

impl SimulatedAssetLoader {
    #[must_use]
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            tracks: config.tracks.clone(),
            duration: config.media_duration(),
            tracks_delay: Duration::from_millis(config.tracks_delay_ms),
            duration_delay: Duration::from_millis(config.duration_delay_ms),
            fail_tracks: config.fail_tracks,
            fail_duration: config.fail_duration,
        }
    }
}

#[async_trait]
impl AssetLoader for SimulatedAssetLoader {
    async fn load_tracks(&self, asset: &AssetHandle) -> Result<Vec<TrackInfo>, LoaderError> {
        tokio::time::sleep(self.tracks_delay).await;
        debug!(asset = %asset.name(), fail = self.fail_tracks, "Simulated tracks load finished");

        if self.fail_tracks {
            return Err(LoaderError::Network(format!(
                "simulated failure loading tracks for {}",
                asset.name()
            )));
        }
        Ok(self.tracks.clone())
    }

    async fn load_duration(&self, asset: &AssetHandle) -> Result<MediaDuration, LoaderError> {
        tokio::time::sleep(self.duration_delay).await;
        debug!(
            asset = %asset.name(),
            fail = self.fail_duration,
            "Simulated duration load finished"
        );

        if self.fail_duration {
            return Err(LoaderError::Network(format!(
                "simulated failure loading duration for {}",
                asset.name()
            )));
        }
        Ok(self.duration)
    }
}
