//! Playback session
//!
//! One session per played asset: it owns a readiness coordinator and a
//! playback starter and runs load, readiness and playback in sequence.

use tracing::{info, instrument};

use super::{
    playback::{PlaybackStarter, PlaybackSummary},
    readiness::ReadinessCoordinator,
};
use crate::{
    logging::generate_session_id,
    models::{AssetHandle, ReadinessReport},
    Result,
};

/// How a session ended
#[derive(Debug, Clone)]
pub enum SessionOutcome {
    /// The asset never became ready; playback was not attempted
    NotReady(ReadinessReport),
    /// Playback ran to the end of the item
    Played(PlaybackSummary),
}

#[derive(Debug)]
pub struct PlaybackSession {
    id: String,
    coordinator: ReadinessCoordinator,
    starter: PlaybackStarter,
}

impl PlaybackSession {
    #[must_use]
    pub fn new(coordinator: ReadinessCoordinator, starter: PlaybackStarter) -> Self {
        Self {
            id: generate_session_id(),
            coordinator,
            starter,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Load the asset, and play it through to the end once it is ready
    #[instrument(skip_all, fields(session_id = %self.id, asset = %asset.name()))]
    pub async fn run(&self, asset: AssetHandle) -> Result<SessionOutcome> {
        let report = self.coordinator.begin(asset)?.wait().await;

        let Some(playback) = self.starter.start(&report).await? else {
            info!(failures = report.failures.len(), "Session ended without playback");
            return Ok(SessionOutcome::NotReady(report));
        };

        let summary = playback.finished().await?;
        info!(
            progress_reports = summary.progress_reports,
            position_secs = summary.last_position.as_secs_f64(),
            "Session complete"
        );
        Ok(SessionOutcome::Played(summary))
    }
}
