use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("update history not found at '{path}'")]
    NotFound { path: PathBuf },

    #[error("update history at '{path}' has no entries")]
    Empty { path: PathBuf },

    #[error("failed to read update history at '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write update history at '{path}'")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse update history at '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize update history")]
    Serialize(#[source] serde_json::Error),
}
