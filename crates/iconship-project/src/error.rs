use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("no icon monorepo found traversing from '{start_dir}'")]
    NotFound { start_dir: PathBuf },

    #[error("failed to access '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read config at '{path}'")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config at '{path}'")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config at '{path}': {reason}")]
    InvalidConfig { path: PathBuf, reason: &'static str },

    #[error(transparent)]
    Manifest(#[from] iconship_manifest::ManifestError),
}
