//! Bootstrap module for initializing a playback session
//!
//! This module handles:
//! - Configuration loading
//! - Wiring the asset loader, player factory and session together

pub mod config;
pub mod session;

pub use config::load_config;
pub use session::init_session;
