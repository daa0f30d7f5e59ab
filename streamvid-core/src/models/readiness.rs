//! Asset readiness state
//!
//! A [`JoinBarrier`] owns exactly two completion slots, one per tracked asset
//! property. Each slot moves from `Pending` to `Loaded` or `Failed` exactly once;
//! the barrier resolves when both slots have left `Pending`, regardless of the
//! order in which they complete.

use super::asset::{AssetHandle, AssetProperty, MediaDuration, TrackInfo};
use crate::loader::LoaderError;

/// Load state of a single asset property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyLoadState<T> {
    Pending,
    Loaded(T),
    Failed(AssetLoadError),
}

impl<T> Default for PropertyLoadState<T> {
    fn default() -> Self {
        Self::Pending
    }
}

impl<T> PropertyLoadState<T> {
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    #[must_use]
    pub const fn failure(&self) -> Option<&AssetLoadError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Failure to load one asset property.
///
/// Carries the loader's underlying cause when one was reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetLoadError {
    #[error("Failed to load tracks{}", cause_suffix(.0))]
    TrackLoadFailure(Option<LoaderError>),

    #[error("Failed to load duration{}", cause_suffix(.0))]
    DurationLoadFailure(Option<LoaderError>),
}

fn cause_suffix(cause: &Option<LoaderError>) -> String {
    match cause {
        Some(e) => format!(": {e}"),
        None => String::new(),
    }
}

impl AssetLoadError {
    #[must_use]
    pub fn for_property(property: AssetProperty, cause: Option<LoaderError>) -> Self {
        match property {
            AssetProperty::Tracks => Self::TrackLoadFailure(cause),
            AssetProperty::Duration => Self::DurationLoadFailure(cause),
        }
    }

    #[must_use]
    pub const fn property(&self) -> AssetProperty {
        match self {
            Self::TrackLoadFailure(_) => AssetProperty::Tracks,
            Self::DurationLoadFailure(_) => AssetProperty::Duration,
        }
    }

    #[must_use]
    pub const fn cause(&self) -> Option<&LoaderError> {
        match self {
            Self::TrackLoadFailure(cause) | Self::DurationLoadFailure(cause) => cause.as_ref(),
        }
    }
}

/// Whether an asset is ready to play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessSignal {
    Ready,
    NotReady,
}

impl ReadinessSignal {
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl From<bool> for ReadinessSignal {
    fn from(ready: bool) -> Self {
        if ready {
            Self::Ready
        } else {
            Self::NotReady
        }
    }
}

/// Join barrier state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierState {
    AwaitingBoth,
    AwaitingOne,
    Resolved,
}

/// Result of one property load, as delivered to the barrier
#[derive(Debug, Clone)]
pub enum PropertyOutcome {
    Tracks(Result<Vec<TrackInfo>, LoaderError>),
    Duration(Result<MediaDuration, LoaderError>),
}

impl PropertyOutcome {
    #[must_use]
    pub const fn property(&self) -> AssetProperty {
        match self {
            Self::Tracks(_) => AssetProperty::Tracks,
            Self::Duration(_) => AssetProperty::Duration,
        }
    }
}

/// A slot was completed twice. The first completion stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{0} slot already resolved")]
pub struct SlotAlreadyResolved(pub AssetProperty);

#[derive(Debug, Clone, Default)]
pub struct JoinBarrier {
    tracks: PropertyLoadState<Vec<TrackInfo>>,
    duration: PropertyLoadState<MediaDuration>,
}

impl JoinBarrier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> BarrierState {
        match (self.tracks.is_pending(), self.duration.is_pending()) {
            (true, true) => BarrierState::AwaitingBoth,
            (false, false) => BarrierState::Resolved,
            _ => BarrierState::AwaitingOne,
        }
    }

    #[must_use]
    pub const fn tracks(&self) -> &PropertyLoadState<Vec<TrackInfo>> {
        &self.tracks
    }

    #[must_use]
    pub const fn duration(&self) -> &PropertyLoadState<MediaDuration> {
        &self.duration
    }

    /// Resolve the slot the outcome belongs to.
    ///
    /// Returns the barrier state after the transition. A slot that already left
    /// `Pending` is never overwritten.
    pub fn complete(
        &mut self,
        outcome: PropertyOutcome,
    ) -> Result<BarrierState, SlotAlreadyResolved> {
        let property = outcome.property();
        match outcome {
            PropertyOutcome::Tracks(result) => {
                if !self.tracks.is_pending() {
                    return Err(SlotAlreadyResolved(property));
                }
                self.tracks = match result {
                    Ok(tracks) => PropertyLoadState::Loaded(tracks),
                    Err(e) => PropertyLoadState::Failed(AssetLoadError::TrackLoadFailure(Some(e))),
                };
            }
            PropertyOutcome::Duration(result) => {
                if !self.duration.is_pending() {
                    return Err(SlotAlreadyResolved(property));
                }
                self.duration = match result {
                    Ok(duration) => PropertyLoadState::Loaded(duration),
                    Err(e) => {
                        PropertyLoadState::Failed(AssetLoadError::DurationLoadFailure(Some(e)))
                    }
                };
            }
        }
        Ok(self.state())
    }

    /// Fail every slot still pending with the given cause.
    ///
    /// Returns the failures that were recorded.
    pub fn abandon_pending(&mut self, cause: &LoaderError) -> Vec<AssetLoadError> {
        let mut abandoned = Vec::new();
        if self.tracks.is_pending() {
            let failure = AssetLoadError::TrackLoadFailure(Some(cause.clone()));
            self.tracks = PropertyLoadState::Failed(failure.clone());
            abandoned.push(failure);
        }
        if self.duration.is_pending() {
            let failure = AssetLoadError::DurationLoadFailure(Some(cause.clone()));
            self.duration = PropertyLoadState::Failed(failure.clone());
            abandoned.push(failure);
        }
        abandoned
    }

    /// Ready iff both properties loaded. `None` until the barrier is resolved.
    #[must_use]
    pub const fn signal(&self) -> Option<ReadinessSignal> {
        match self.state() {
            BarrierState::Resolved => {
                let signal = if self.tracks.is_loaded() && self.duration.is_loaded() {
                    ReadinessSignal::Ready
                } else {
                    ReadinessSignal::NotReady
                };
                Some(signal)
            }
            _ => None,
        }
    }

    /// Consume a resolved barrier into the report published for the asset.
    ///
    /// Returns the barrier back unchanged if it has not resolved yet.
    pub fn into_report(self, asset: AssetHandle) -> Result<ReadinessReport, Self> {
        let Some(signal) = self.signal() else {
            return Err(self);
        };

        let mut failures = Vec::new();
        let tracks = match self.tracks {
            PropertyLoadState::Loaded(tracks) => Some(tracks),
            PropertyLoadState::Failed(e) => {
                failures.push(e);
                None
            }
            PropertyLoadState::Pending => None,
        };
        let duration = match self.duration {
            PropertyLoadState::Loaded(duration) => Some(duration),
            PropertyLoadState::Failed(e) => {
                failures.push(e);
                None
            }
            PropertyLoadState::Pending => None,
        };

        Ok(ReadinessReport {
            asset,
            signal,
            tracks,
            duration,
            failures,
        })
    }
}

/// Readiness of one asset, published once both property loads resolved
#[derive(Debug, Clone)]
pub struct ReadinessReport {
    pub asset: AssetHandle,
    pub signal: ReadinessSignal,
    pub tracks: Option<Vec<TrackInfo>>,
    pub duration: Option<MediaDuration>,
    /// Failures in property order (tracks first)
    pub failures: Vec<AssetLoadError>,
}

impl ReadinessReport {
    /// Report for an asset whose loads never reported back
    #[must_use]
    pub fn abandoned(asset: AssetHandle) -> Self {
        Self {
            asset,
            signal: ReadinessSignal::NotReady,
            tracks: None,
            duration: None,
            failures: vec![
                AssetLoadError::TrackLoadFailure(Some(LoaderError::Aborted)),
                AssetLoadError::DurationLoadFailure(Some(LoaderError::Aborted)),
            ],
        }
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.signal.is_ready()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrackKind;
    use std::time::Duration;

    fn tracks_ok() -> PropertyOutcome {
        PropertyOutcome::Tracks(Ok(vec![TrackInfo::new(1, TrackKind::Video, "avc1")]))
    }

    fn duration_ok() -> PropertyOutcome {
        PropertyOutcome::Duration(Ok(MediaDuration::Finite(Duration::from_secs(30))))
    }

    fn tracks_err() -> PropertyOutcome {
        PropertyOutcome::Tracks(Err(LoaderError::Network("connection reset".to_string())))
    }

    fn duration_err() -> PropertyOutcome {
        PropertyOutcome::Duration(Err(LoaderError::Network("timed out".to_string())))
    }

    fn resolve(first: PropertyOutcome, second: PropertyOutcome) -> JoinBarrier {
        let mut barrier = JoinBarrier::new();
        assert_eq!(barrier.state(), BarrierState::AwaitingBoth);
        assert_eq!(barrier.complete(first), Ok(BarrierState::AwaitingOne));
        assert_eq!(barrier.signal(), None);
        assert_eq!(barrier.complete(second), Ok(BarrierState::Resolved));
        barrier
    }

    #[test]
    fn test_both_loaded_is_ready() {
        let barrier = resolve(tracks_ok(), duration_ok());
        assert_eq!(barrier.signal(), Some(ReadinessSignal::Ready));
    }

    #[test]
    fn test_any_failure_is_not_ready() {
        for (a, b) in [
            (tracks_err(), duration_ok()),
            (tracks_ok(), duration_err()),
            (tracks_err(), duration_err()),
        ] {
            let barrier = resolve(a, b);
            assert_eq!(barrier.signal(), Some(ReadinessSignal::NotReady));
        }
    }

    #[test]
    fn test_completion_order_is_symmetric() {
        let forward = resolve(tracks_err(), duration_ok());
        let reverse = resolve(duration_ok(), tracks_err());
        assert_eq!(forward.signal(), reverse.signal());
        assert_eq!(forward.tracks(), reverse.tracks());
        assert_eq!(forward.duration(), reverse.duration());
    }

    #[test]
    fn test_slot_never_reverts() {
        let mut barrier = JoinBarrier::new();
        barrier.complete(tracks_err()).unwrap();

        assert_eq!(
            barrier.complete(tracks_ok()),
            Err(SlotAlreadyResolved(AssetProperty::Tracks))
        );
        assert_eq!(barrier.state(), BarrierState::AwaitingOne);
        assert!(barrier.tracks().failure().is_some());
    }

    #[test]
    fn test_abandon_pending_fails_remaining_slots() {
        let mut barrier = JoinBarrier::new();
        barrier.complete(duration_ok()).unwrap();

        let abandoned = barrier.abandon_pending(&LoaderError::Aborted);
        assert_eq!(
            abandoned,
            vec![AssetLoadError::TrackLoadFailure(Some(LoaderError::Aborted))]
        );
        assert_eq!(barrier.signal(), Some(ReadinessSignal::NotReady));
        assert!(barrier.abandon_pending(&LoaderError::Aborted).is_empty());
    }

    #[test]
    fn test_into_report() {
        let asset = AssetHandle::parse("https://example.com/live/index.m3u8").unwrap();

        let pending = JoinBarrier::new();
        assert!(pending.into_report(asset.clone()).is_err());

        let report = resolve(tracks_ok(), duration_err())
            .into_report(asset.clone())
            .unwrap();
        assert!(!report.is_ready());
        assert_eq!(report.asset, asset);
        assert_eq!(report.tracks.as_ref().map(Vec::len), Some(1));
        assert_eq!(report.duration, None);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].property(), AssetProperty::Duration);
    }

    #[test]
    fn test_load_error_display() {
        let with_cause =
            AssetLoadError::TrackLoadFailure(Some(LoaderError::Network("reset".to_string())));
        assert_eq!(with_cause.to_string(), "Failed to load tracks: Network error: reset");

        let without = AssetLoadError::for_property(AssetProperty::Duration, None);
        assert_eq!(without.to_string(), "Failed to load duration");
        assert!(without.cause().is_none());
    }
}
