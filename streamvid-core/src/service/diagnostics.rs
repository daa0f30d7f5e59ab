//! Asset load diagnostics
//!
//! Advisory records for property load failures. Recording a failure never
//! changes control flow.

use tracing::warn;

use crate::models::{AssetHandle, AssetLoadError};

/// Sink for asset property load failures
#[cfg_attr(test, mockall::automock)]
pub trait Diagnostics: Send + Sync {
    /// Called once for every property that failed to load
    fn property_failed(&self, asset: &AssetHandle, failure: &AssetLoadError);
}

/// Emits one structured warning per failure
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn property_failed(&self, asset: &AssetHandle, failure: &AssetLoadError) {
        warn!(
            asset = %asset.name(),
            asset_id = %asset.id(),
            property = %failure.property(),
            error = %failure,
            "Asset property failed to load"
        );
    }
}
