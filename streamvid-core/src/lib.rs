//! Asset readiness and playback start for streamed media
//!
//! An asset's tracks and duration are loaded concurrently and joined into a
//! single readiness report; a ready asset is handed to a media player whose
//! progress is logged periodically. The media framework itself (loading,
//! decoding, rendering) sits behind the [`loader::AssetLoader`] and
//! [`player::PlayerFactory`] traits.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod models;
pub mod player;
pub mod service;

pub use config::Config;
pub use error::{Error, Result};
