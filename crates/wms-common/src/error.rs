//! Error types for the geoportal WMS crates.

use thiserror::Error;

use crate::bbox::BboxParseError;
use crate::crs::CrsParseError;
use crate::version::VersionParseError;

/// Result type alias using WmsError.
pub type WmsResult<T> = Result<T, WmsError>;

/// Primary error type for WMS operations.
#[derive(Debug, Error)]
pub enum WmsError {
    // === Layer construction ===
    #[error("Invalid layer request: {0}")]
    InvalidLayerRequest(String),

    #[error("Unsupported WMS version: {0}")]
    UnsupportedVersion(String),

    #[error("Invalid CRS: {0}")]
    InvalidCrs(String),

    #[error("Invalid BBOX: {0}")]
    InvalidBbox(String),

    // === Capabilities ===
    #[error("Invalid capabilities document: {0}")]
    CapabilitiesError(String),

    #[error("Service exception ({code}): {message}")]
    ServiceException { code: String, message: String },

    // === Infrastructure ===
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<serde_json::Error> for WmsError {
    fn from(err: serde_json::Error) -> Self {
        WmsError::ConfigError(format!("JSON error: {}", err))
    }
}

impl From<VersionParseError> for WmsError {
    fn from(err: VersionParseError) -> Self {
        match err {
            VersionParseError::Unsupported(v) => WmsError::UnsupportedVersion(v),
        }
    }
}

impl From<CrsParseError> for WmsError {
    fn from(err: CrsParseError) -> Self {
        match err {
            CrsParseError::UnsupportedCrs(c) => WmsError::InvalidCrs(c),
        }
    }
}

impl From<BboxParseError> for WmsError {
    fn from(err: BboxParseError) -> Self {
        WmsError::InvalidBbox(err.to_string())
    }
}
