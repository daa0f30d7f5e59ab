//! Session wiring

use std::sync::Arc;

use tracing::info;

use crate::{
    loader::SimulatedAssetLoader,
    player::SimulatedPlayerFactory,
    service::{PlaybackSession, PlaybackStarter, ReadinessCoordinator},
    Config,
};

/// Build a playback session backed by the simulated media framework
#[must_use]
pub fn init_session(config: &Config) -> PlaybackSession {
    let loader = Arc::new(SimulatedAssetLoader::new(&config.simulation));
    let factory = Arc::new(SimulatedPlayerFactory::new(&config.simulation));

    let coordinator = ReadinessCoordinator::new(loader);
    let starter = PlaybackStarter::new(factory, config.player.progress_interval());
    let session = PlaybackSession::new(coordinator, starter);

    info!(
        session_id = %session.id(),
        progress_interval_ms = config.player.progress_interval_ms,
        media_duration = %config.simulation.media_duration(),
        "Playback session initialized"
    );
    session
}
