use thiserror::Error;

use crate::models::AssetId;
use crate::player::PlayerError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Asset already submitted: {0}")]
    AssetAlreadySubmitted(AssetId),

    #[error("Playback error: {0}")]
    Playback(#[from] PlayerError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
