pub mod diagnostics;
pub mod playback;
pub mod readiness;
pub mod session;

pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub use playback::{PlaybackHandle, PlaybackStarter, PlaybackSummary};
pub use readiness::{ReadinessCoordinator, ReadinessSubscription};
pub use session::{PlaybackSession, SessionOutcome};
