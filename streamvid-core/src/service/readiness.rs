//! Asset readiness coordination
//!
//! Starts the tracks and duration loads for an asset as two independent tasks
//! and joins them in a single coordinating task that owns the [`JoinBarrier`].
//! Load results reach the barrier only as messages, so the two completions
//! are applied one at a time. Once both have resolved the readiness report is
//! published exactly once on a watch channel, whose sender is then dropped.

use std::sync::Arc;

use dashmap::DashSet;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use super::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::{
    loader::{AssetLoader, LoaderError},
    models::{
        AssetHandle, AssetId, AssetProperty, BarrierState, JoinBarrier, PropertyLoadState,
        PropertyOutcome, ReadinessReport,
    },
    Error, Result,
};

/// Joins the property loads of each submitted asset into one readiness report.
///
/// Meant to live for one playback session: the set of submitted assets is
/// never pruned.
pub struct ReadinessCoordinator {
    loader: Arc<dyn AssetLoader>,
    diagnostics: Arc<dyn Diagnostics>,
    /// Assets already begun on this coordinator; grows for its lifetime
    submitted: DashSet<AssetId>,
}

impl std::fmt::Debug for ReadinessCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadinessCoordinator")
            .field("submitted", &self.submitted.len())
            .finish()
    }
}

impl ReadinessCoordinator {
    /// Create a coordinator that reports failures through `tracing`
    #[must_use]
    pub fn new(loader: Arc<dyn AssetLoader>) -> Self {
        Self {
            loader,
            diagnostics: Arc::new(TracingDiagnostics),
            submitted: DashSet::new(),
        }
    }

    /// Replace the diagnostics sink
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Start loading the asset's tracks and duration.
    ///
    /// Load failures never surface here; they are folded into a not-ready
    /// report. The only error is submitting the same asset twice.
    ///
    /// Must be called from within a tokio runtime.
    pub fn begin(&self, asset: AssetHandle) -> Result<ReadinessSubscription> {
        if !self.submitted.insert(asset.id().clone()) {
            return Err(Error::AssetAlreadySubmitted(asset.id().clone()));
        }

        info!(asset = %asset.name(), asset_id = %asset.id(), "Loading asset properties");

        let (outcome_tx, outcome_rx) = mpsc::channel(2);
        let (report_tx, report_rx) = watch::channel(None);

        let loader = Arc::clone(&self.loader);
        let tracks_asset = asset.clone();
        let tracks_tx = outcome_tx.clone();
        tokio::spawn(async move {
            let result = loader.load_tracks(&tracks_asset).await;
            let _ = tracks_tx.send(PropertyOutcome::Tracks(result)).await;
        });

        let loader = Arc::clone(&self.loader);
        let duration_asset = asset.clone();
        tokio::spawn(async move {
            let result = loader.load_duration(&duration_asset).await;
            let _ = outcome_tx.send(PropertyOutcome::Duration(result)).await;
        });

        tokio::spawn(coordinate(
            asset.clone(),
            outcome_rx,
            report_tx,
            Arc::clone(&self.diagnostics),
        ));

        Ok(ReadinessSubscription {
            asset,
            rx: report_rx,
        })
    }

    /// Whether the asset has already been begun on this coordinator
    #[must_use]
    pub fn is_submitted(&self, asset: &AssetHandle) -> bool {
        self.submitted.contains(asset.id())
    }
}

async fn coordinate(
    asset: AssetHandle,
    mut outcomes: mpsc::Receiver<PropertyOutcome>,
    publisher: watch::Sender<Option<ReadinessReport>>,
    diagnostics: Arc<dyn Diagnostics>,
) {
    let mut barrier = JoinBarrier::new();

    while let Some(outcome) = outcomes.recv().await {
        let property = outcome.property();
        match barrier.complete(outcome) {
            Ok(state) => {
                record_completion(&asset, property, &barrier, diagnostics.as_ref());
                debug!(asset = %asset.name(), ?state, "Join barrier advanced");
                if state == BarrierState::Resolved {
                    break;
                }
            }
            Err(e) => {
                warn!(asset = %asset.name(), error = %e, "Ignoring repeated property completion");
            }
        }
    }

    // Both load tasks are gone; anything still pending will never report
    for failure in barrier.abandon_pending(&LoaderError::Aborted) {
        diagnostics.property_failed(&asset, &failure);
    }

    let report = match barrier.into_report(asset.clone()) {
        Ok(report) => report,
        Err(barrier) => {
            error!(asset = %asset.name(), state = ?barrier.state(), "Join barrier did not resolve");
            return;
        }
    };

    info!(
        asset = %asset.name(),
        ready = report.is_ready(),
        failures = report.failures.len(),
        "Asset readiness resolved"
    );
    publisher.send_replace(Some(report));
}

fn record_completion(
    asset: &AssetHandle,
    property: AssetProperty,
    barrier: &JoinBarrier,
    diagnostics: &dyn Diagnostics,
) {
    match property {
        AssetProperty::Tracks => match barrier.tracks() {
            PropertyLoadState::Loaded(tracks) => {
                info!(asset = %asset.name(), tracks = tracks.len(), "Asset tracks loaded");
            }
            PropertyLoadState::Failed(failure) => diagnostics.property_failed(asset, failure),
            PropertyLoadState::Pending => {}
        },
        AssetProperty::Duration => match barrier.duration() {
            PropertyLoadState::Loaded(duration) => {
                info!(asset = %asset.name(), duration = %duration, "Asset duration loaded");
            }
            PropertyLoadState::Failed(failure) => diagnostics.property_failed(asset, failure),
            PropertyLoadState::Pending => {}
        },
    }
}

/// Handle to the single readiness report of one asset.
///
/// Clones observe the same report.
#[derive(Debug, Clone)]
pub struct ReadinessSubscription {
    asset: AssetHandle,
    rx: watch::Receiver<Option<ReadinessReport>>,
}

impl ReadinessSubscription {
    #[must_use]
    pub const fn asset(&self) -> &AssetHandle {
        &self.asset
    }

    /// The report, if it has been published
    #[must_use]
    pub fn try_get(&self) -> Option<ReadinessReport> {
        (*self.rx.borrow()).clone()
    }

    /// Wait for the report.
    ///
    /// If the coordinating task is torn down before publishing (runtime
    /// shutdown), an abandoned not-ready report is returned. Its failures are
    /// not reported to [`Diagnostics`].
    pub async fn wait(&mut self) -> ReadinessReport {
        let published = match self.rx.wait_for(Option::is_some).await {
            Ok(report) => (*report).clone(),
            Err(_) => None,
        };
        published.unwrap_or_else(|| ReadinessReport::abandoned(self.asset.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::config::SimulationConfig;
    use crate::loader::{MockAssetLoader, SimulatedAssetLoader};
    use crate::models::{AssetLoadError, MediaDuration, ReadinessSignal, TrackInfo, TrackKind};
    use crate::service::diagnostics::MockDiagnostics;

    fn asset() -> AssetHandle {
        AssetHandle::parse(crate::config::DEFAULT_ASSET_URL).unwrap()
    }

    fn simulated(config: SimulationConfig) -> Arc<dyn AssetLoader> {
        Arc::new(SimulatedAssetLoader::new(&config))
    }

    fn expect_failures(property: Option<AssetProperty>, times: usize) -> Arc<dyn Diagnostics> {
        let mut diagnostics = MockDiagnostics::new();
        diagnostics
            .expect_property_failed()
            .withf(move |_, failure| property.map_or(true, |p| failure.property() == p))
            .times(times)
            .return_const(());
        Arc::new(diagnostics)
    }

    #[tokio::test(start_paused = true)]
    async fn test_both_loaded_is_ready() {
        let coordinator = ReadinessCoordinator::new(simulated(SimulationConfig::default()))
            .with_diagnostics(expect_failures(None, 0));
        let asset = asset();

        let report = coordinator.begin(asset.clone()).unwrap().wait().await;

        assert_eq!(report.signal, ReadinessSignal::Ready);
        assert!(report.asset.same_asset(&asset));
        assert_eq!(report.tracks.map(|t| t.len()), Some(2));
        assert_eq!(
            report.duration,
            Some(MediaDuration::Finite(Duration::from_secs(60)))
        );
        assert!(report.failures.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_track_failure_is_not_ready() {
        let coordinator = ReadinessCoordinator::new(simulated(SimulationConfig {
            fail_tracks: true,
            ..SimulationConfig::default()
        }))
        .with_diagnostics(expect_failures(Some(AssetProperty::Tracks), 1));

        let report = coordinator.begin(asset()).unwrap().wait().await;

        assert_eq!(report.signal, ReadinessSignal::NotReady);
        assert!(report.duration.is_some());
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            report.failures[0],
            AssetLoadError::TrackLoadFailure(Some(LoaderError::Network(_)))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_duration_failure_is_not_ready() {
        let coordinator = ReadinessCoordinator::new(simulated(SimulationConfig {
            fail_duration: true,
            ..SimulationConfig::default()
        }))
        .with_diagnostics(expect_failures(Some(AssetProperty::Duration), 1));

        let report = coordinator.begin(asset()).unwrap().wait().await;

        assert!(!report.is_ready());
        assert!(report.tracks.is_some());
        assert_eq!(report.failures[0].property(), AssetProperty::Duration);
    }

    #[tokio::test(start_paused = true)]
    async fn test_both_failures_are_recorded() {
        let coordinator = ReadinessCoordinator::new(simulated(SimulationConfig {
            fail_tracks: true,
            fail_duration: true,
            ..SimulationConfig::default()
        }))
        .with_diagnostics(expect_failures(None, 2));

        let report = coordinator.begin(asset()).unwrap().wait().await;

        assert!(!report.is_ready());
        assert_eq!(report.failures.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_order_does_not_matter() {
        let mut signals = Vec::new();
        for (tracks_delay_ms, duration_delay_ms) in [(50, 400), (400, 50)] {
            let coordinator = ReadinessCoordinator::new(simulated(SimulationConfig {
                tracks_delay_ms,
                duration_delay_ms,
                fail_tracks: true,
                ..SimulationConfig::default()
            }))
            .with_diagnostics(expect_failures(Some(AssetProperty::Tracks), 1));

            let report = coordinator.begin(asset()).unwrap().wait().await;
            signals.push((report.signal, report.failures));
        }

        assert_eq!(signals[0], signals[1]);
        assert_eq!(signals[0].0, ReadinessSignal::NotReady);
    }

    #[tokio::test(start_paused = true)]
    async fn test_published_only_after_both_loads() {
        let coordinator = ReadinessCoordinator::new(simulated(SimulationConfig {
            tracks_delay_ms: 100,
            duration_delay_ms: 1_000,
            ..SimulationConfig::default()
        }));
        let start = tokio::time::Instant::now();
        let mut subscription = coordinator.begin(asset()).unwrap();

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(subscription.try_get().is_none());

        let report = subscription.wait().await;
        assert!(report.is_ready());
        assert_eq!(start.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_subscriber_sees_the_same_report() {
        let coordinator = ReadinessCoordinator::new(simulated(SimulationConfig::default()));
        let mut first = coordinator.begin(asset()).unwrap();
        let mut second = first.clone();

        let (a, b) = tokio::join!(first.wait(), second.wait());
        assert_eq!(a.signal, b.signal);
        assert!(a.asset.same_asset(&b.asset));

        // The report stays readable after publication
        assert!(first.try_get().is_some_and(|r| r.is_ready()));
    }

    #[tokio::test]
    async fn test_asset_submitted_at_most_once() {
        let coordinator = ReadinessCoordinator::new(simulated(SimulationConfig {
            tracks_delay_ms: 0,
            duration_delay_ms: 0,
            ..SimulationConfig::default()
        }));
        let asset = asset();

        assert!(coordinator.begin(asset.clone()).is_ok());
        assert!(coordinator.is_submitted(&asset));
        assert!(matches!(
            coordinator.begin(asset.clone()),
            Err(Error::AssetAlreadySubmitted(id)) if &id == asset.id()
        ));

        // Same URL, different asset
        assert!(coordinator.begin(self::asset()).is_ok());
    }

    #[tokio::test]
    async fn test_mock_loader_errors_carry_cause() {
        let cause = LoaderError::UnsupportedFormat("EXT-X-ENDLIST missing".to_string());
        let mut loader = MockAssetLoader::new();
        loader
            .expect_load_tracks()
            .times(1)
            .returning(|_| Ok(vec![TrackInfo::new(1, TrackKind::Video, "hvc1")]));
        let returned = cause.clone();
        loader
            .expect_load_duration()
            .times(1)
            .returning(move |_| Err(returned.clone()));

        let coordinator = ReadinessCoordinator::new(Arc::new(loader));
        let report = coordinator.begin(asset()).unwrap().wait().await;

        assert!(!report.is_ready());
        assert_eq!(report.failures[0].cause(), Some(&cause));
    }

    #[tokio::test]
    async fn test_wait_without_publication_is_abandoned() {
        let (report_tx, report_rx) = watch::channel(None);
        let mut subscription = ReadinessSubscription {
            asset: asset(),
            rx: report_rx,
        };
        drop(report_tx);

        let report = subscription.wait().await;

        assert!(!report.is_ready());
        assert!(report.asset.same_asset(subscription.asset()));
        assert_eq!(
            report.failures,
            vec![
                AssetLoadError::TrackLoadFailure(Some(LoaderError::Aborted)),
                AssetLoadError::DurationLoadFailure(Some(LoaderError::Aborted)),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_submitted_assets_are_kept_after_resolution() {
        let coordinator = ReadinessCoordinator::new(simulated(SimulationConfig::default()));
        let asset = asset();

        let report = coordinator.begin(asset.clone()).unwrap().wait().await;
        assert!(report.is_ready());

        assert!(coordinator.is_submitted(&asset));
        assert!(matches!(coordinator.begin(asset), Err(Error::AssetAlreadySubmitted(_))));
    }

    struct CrashingTracksLoader;

    #[async_trait]
    impl AssetLoader for CrashingTracksLoader {
        async fn load_tracks(
            &self,
            _asset: &AssetHandle,
        ) -> std::result::Result<Vec<TrackInfo>, LoaderError> {
            panic!("tracks loader crashed");
        }

        async fn load_duration(
            &self,
            _asset: &AssetHandle,
        ) -> std::result::Result<MediaDuration, LoaderError> {
            Ok(MediaDuration::Indefinite)
        }
    }

    #[tokio::test]
    async fn test_vanished_load_is_reported_as_aborted() {
        let coordinator = ReadinessCoordinator::new(Arc::new(CrashingTracksLoader))
            .with_diagnostics(expect_failures(Some(AssetProperty::Tracks), 1));

        let report = coordinator.begin(asset()).unwrap().wait().await;

        assert!(!report.is_ready());
        assert_eq!(report.duration, Some(MediaDuration::Indefinite));
        assert_eq!(
            report.failures,
            vec![AssetLoadError::TrackLoadFailure(Some(LoaderError::Aborted))]
        );
    }
}
