// Asset Loader Traits
//
// Boundary to the media framework that resolves asset metadata. Loads run on
// whatever execution context the implementation chooses; the readiness
// coordinator only sequences them.

use async_trait::async_trait;

use super::LoaderError;
use crate::models::{AssetHandle, MediaDuration, TrackInfo};

/// Asynchronous asset property loader
///
/// Both methods may be called concurrently for the same asset and must each
/// resolve exactly once.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetLoader: Send + Sync {
    /// Load the asset's track metadata
    async fn load_tracks(&self, asset: &AssetHandle) -> Result<Vec<TrackInfo>, LoaderError>;

    /// Load the asset's duration
    async fn load_duration(&self, asset: &AssetHandle) -> Result<MediaDuration, LoaderError>;
}
