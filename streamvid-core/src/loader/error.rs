// Asset Loader Error Types

/// Underlying cause reported by an asset loader
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoaderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Load aborted before reporting a result")]
    Aborted,

    #[error("{0}")]
    Other(String),
}
