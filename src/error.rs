use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading the boundary dataset
#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: simd_json::Error,
    },

    #[error("{path} contains no drawable regions")]
    NoRegions { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, MapError>;
