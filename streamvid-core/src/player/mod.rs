// Media Player
//
// `MediaPlayer` and `PlayerFactory` are the external playback collaborators.
// `SimulatedPlayer` plays back on the tokio clock without decoding anything.

pub mod error;
pub mod simulated;
pub mod traits;

pub use error::*;
pub use simulated::{SimulatedPlayer, SimulatedPlayerFactory};
pub use traits::*;
