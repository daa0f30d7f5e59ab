// Asset Loader
//
// `AssetLoader` is the external collaborator that resolves asset properties.
// `SimulatedAssetLoader` stands in for a platform media framework.

pub mod error;
pub mod simulated;
pub mod traits;

pub use error::*;
pub use simulated::SimulatedAssetLoader;
pub use traits::*;
