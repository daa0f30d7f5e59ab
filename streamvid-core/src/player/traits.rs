// Media Player Traits
//
// Boundary to the media framework that decodes, renders and streams an asset.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::PlayerError;
use crate::models::AssetHandle;

/// A player bound to a single asset
#[async_trait]
pub trait MediaPlayer: Send + Sync {
    /// Resolves once the player item is ready to play
    async fn ready_to_play(&self) -> Result<(), PlayerError>;

    /// Begin playback
    fn play(&self);

    /// Current playback position
    fn position(&self) -> Duration;

    /// Resolves when playback reaches the end of the item.
    ///
    /// Never resolves for indefinite (live) media.
    async fn finished(&self);
}

/// Constructs players for ready assets
pub trait PlayerFactory: Send + Sync {
    fn create(&self, asset: &AssetHandle) -> Arc<dyn MediaPlayer>;
}
