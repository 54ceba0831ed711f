//! Error types for route synchronization.
//!
//! Every failure is terminal for the run: errors bubble up to `main` with `?`,
//! get logged once, and the process exits non-zero without writing output.

use std::path::PathBuf;

/// Result type for docs_routes operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while synchronizing the routes manifest
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest at {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("Platform {platform} is not declared in _routes.yml")]
    PlatformNotFound { platform: String },

    #[error(
        "Number of hubs in _routes.yml does not match number of hubs in docs/{platform}/articles. Please update _routes.yml with hub info."
    )]
    HubCountMismatch {
        platform: String,
        on_disk: usize,
        declared: usize,
    },

    #[error("Hub {hub} is declared more than once for platform {platform}")]
    DuplicateHub { platform: String, hub: String },

    #[error("Hub {hub} found in docs/articles/{platform} but not in _routes.yml")]
    HubNotFound { platform: String, hub: String },

    #[error("{path} is out of date; regenerate it instead of editing it by hand")]
    OutputStale { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for failures that come from reading or writing the filesystem.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}
