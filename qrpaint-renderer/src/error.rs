//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while rasterizing.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Configuration or encoding failed before any pixel was written.
    #[error(transparent)]
    Core(#[from] qrpaint_core::CoreError),

    /// The surface cannot be prepared with the requested geometry.
    #[error("invalid surface geometry: {0}")]
    Surface(String),

    /// A logo source could not be fetched or decoded. Never surfaced by the
    /// render entry points - the overlay is best-effort - but returned by the
    /// loader so callers probing a source directly see what went wrong.
    #[error("failed to load logo: {0}")]
    Logo(String),

    /// The finished raster could not be encoded for export.
    #[error("failed to export raster: {0}")]
    Export(String),
}
