//! Error types for core operations.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while preparing a render.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration describes a degenerate raster.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A colour literal could not be parsed.
    #[error("invalid colour literal: {0:?}")]
    Color(String),

    /// The payload could not be encoded into a QR symbol.
    #[error("QR encoding failed: {0:?}")]
    Encode(qrcode::types::QrError),
}

impl From<qrcode::types::QrError> for CoreError {
    fn from(err: qrcode::types::QrError) -> Self {
        Self::Encode(err)
    }
}
