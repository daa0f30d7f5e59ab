use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::id::AssetId;
use crate::{Error, Result};

/// Opaque, immutable reference to a remote media resource.
///
/// Cloning is cheap; every clone refers to the same asset. Two handles parsed
/// from the same URL are still distinct assets with distinct IDs.
#[derive(Debug, Clone)]
pub struct AssetHandle {
    inner: Arc<AssetInner>,
}

#[derive(Debug)]
struct AssetInner {
    id: AssetId,
    url: Url,
}

impl AssetHandle {
    /// Parse a media URL into a new asset handle.
    ///
    /// Only `http` and `https` resources are accepted.
    pub fn parse(url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| Error::InvalidInput(format!("invalid asset URL '{url}': {e}")))?;
        Self::from_url(url)
    }

    pub fn from_url(url: Url) -> Result<Self> {
        match url.scheme() {
            "http" | "https" => Ok(Self {
                inner: Arc::new(AssetInner {
                    id: AssetId::new(),
                    url,
                }),
            }),
            other => Err(Error::InvalidInput(format!(
                "unsupported asset URL scheme '{other}'"
            ))),
        }
    }

    #[must_use]
    pub fn id(&self) -> &AssetId {
        &self.inner.id
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.inner.url
    }

    /// Last path segment of the URL, or the host when the path is empty.
    #[must_use]
    pub fn name(&self) -> &str {
        self.inner
            .url
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
            .or_else(|| self.inner.url.host_str())
            .unwrap_or_default()
    }

    /// Whether both handles refer to the same asset (not merely the same URL)
    #[must_use]
    pub fn same_asset(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for AssetHandle {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for AssetHandle {}

impl std::fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner.url)
    }
}

/// The two asset properties that must load before playback can start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetProperty {
    Tracks,
    Duration,
}

impl AssetProperty {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tracks => "tracks",
            Self::Duration => "duration",
        }
    }
}

impl std::fmt::Display for AssetProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Track type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
    Subtitle,
}

/// Track metadata reported by the asset loader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    /// Track ID within the asset
    pub id: u32,
    pub kind: TrackKind,
    /// Codec identifier (e.g., "avc1", "mp4a")
    pub codec: String,
}

impl TrackInfo {
    #[must_use]
    pub fn new(id: u32, kind: TrackKind, codec: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            codec: codec.into(),
        }
    }
}

/// Asset duration. Live streams have no end and report `Indefinite`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaDuration {
    Finite(Duration),
    Indefinite,
}

impl MediaDuration {
    #[must_use]
    pub const fn as_duration(&self) -> Option<Duration> {
        match self {
            Self::Finite(d) => Some(*d),
            Self::Indefinite => None,
        }
    }
}

impl std::fmt::Display for MediaDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finite(d) => write!(f, "{}", humantime::format_duration(*d)),
            Self::Indefinite => f.write_str("indefinite"),
        }
    }
}
