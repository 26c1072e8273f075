//! Error types for the gallery core.
//!
//! Loading failures are typed so callers can decide between aborting and
//! falling back to defaults; the application boundary wraps them in `anyhow`.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::PhotoId;

/// Failure to load or validate a photo catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("catalog contains no photos")]
    Empty,

    #[error("duplicate photo id {0}")]
    DuplicateId(PhotoId),

    #[error("photo {id} has non-positive dimensions {width}x{height}")]
    InvalidDimensions { id: PhotoId, width: u32, height: u32 },

    #[error("photo {id} has an empty `{field}`")]
    EmptyField { id: PhotoId, field: &'static str },

    #[error("photo {id} has span {span}, expected 1..={max}")]
    InvalidSpan { id: PhotoId, span: u8, max: u8 },
}

/// Failure to load or validate the user configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Rejected gallery operation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GalleryError {
    #[error("unknown category {0:?}")]
    UnknownCategory(String),
}
