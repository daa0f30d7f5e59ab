// Media Player Error Types

/// Errors reported by a media player
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlayerError {
    #[error("Player item failed: {0}")]
    ItemFailed(String),

    #[error("Player unavailable: {0}")]
    Unavailable(String),
}
