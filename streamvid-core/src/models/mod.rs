pub mod asset;
pub mod id;
pub mod readiness;

pub use asset::{AssetHandle, AssetProperty, MediaDuration, TrackInfo, TrackKind};
pub use id::{generate_id, AssetId};
pub use readiness::{
    AssetLoadError, BarrierState, JoinBarrier, PropertyLoadState, PropertyOutcome,
    ReadinessReport, ReadinessSignal, SlotAlreadyResolved,
};
