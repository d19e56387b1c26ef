//! Render configuration - the immutable input that fully determines a raster.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::{CoreError, CoreResult};

/// QR error-correction level, forwarded opaquely to the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EcLevel {
    /// ~7% recovery.
    L,
    /// ~15% recovery (the common default).
    M,
    /// ~25% recovery.
    Q,
    /// ~30% recovery.
    H,
}

/// How dark modules are painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleStyle {
    /// One rectangle per dark module. The lowest-risk default.
    Squares,
    /// One under-filled circle per dark module, with the three finder
    /// patterns re-drawn solid so scanners can still lock on.
    Dots,
}

/// Optional logo overlay composited over the painted matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoSettings {
    /// Image source: a filesystem path, an `http(s)` URL, or a `data:` URI.
    /// An empty string disables the overlay.
    pub source: String,
    /// Global alpha applied to the whole overlay, in `[0, 1]`.
    pub opacity: f32,
    /// Destination width in logical pixels. When only one dimension is
    /// given the logo is square; when neither is, it spans 20% of `size`.
    pub width: Option<f64>,
    /// Destination height in logical pixels.
    pub height: Option<f64>,
}

impl LogoSettings {
    /// Overlay a source at full opacity with default sizing.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            opacity: 1.0,
            width: None,
            height: None,
        }
    }

    /// Resolve the destination dimensions against the drawn matrix size.
    #[must_use]
    pub fn resolve_dimensions(&self, size: f64) -> (f64, f64) {
        match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, w),
            (None, Some(h)) => (h, h),
            (None, None) => {
                let side = size * 0.2;
                (side, side)
            }
        }
    }
}

/// Immutable description of one render.
///
/// Defaults match the classic embedding: a 125px symbol with a 15px quiet
/// margin, black on white, square modules, medium error correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Opaque payload bytes handed to the encoder. Callers holding text run
    /// it through [`crate::text::utf8_expand`] first.
    pub payload: Vec<u8>,
    /// Error-correction level, never inspected by the compositor.
    pub ec_level: EcLevel,
    /// Drawn side length in logical pixels, excluding margin. Must be > 0.
    pub size: f64,
    /// Quiet border in logical pixels, painted in `background`. Must be >= 0.
    pub margin: f64,
    /// Module painting style.
    pub style: ModuleStyle,
    /// Dark-module fill colour.
    pub foreground: Rgb,
    /// Background and quiet-margin fill colour.
    pub background: Rgb,
    /// Optional centered logo overlay.
    pub logo: Option<LogoSettings>,
    /// Request anonymous cross-origin mode when fetching a remote logo.
    pub cors_enabled: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            payload: Vec::new(),
            ec_level: EcLevel::M,
            size: 125.0,
            margin: 15.0,
            style: ModuleStyle::Squares,
            foreground: Rgb::BLACK,
            background: Rgb::WHITE,
            logo: None,
            cors_enabled: false,
        }
    }
}

impl RenderConfig {
    /// Full canvas side length in logical pixels: `size + 2 * margin`.
    #[must_use]
    pub fn canvas_size(&self) -> f64 {
        self.size + 2.0 * self.margin
    }

    /// Check that the configuration describes a drawable raster.
    ///
    /// Runs before any pixel is written, so a rejected config never leaves a
    /// half-drawn surface behind.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] for a non-positive or non-finite `size`,
    /// a negative or non-finite `margin`, a logo opacity outside `[0, 1]`, or
    /// non-positive logo dimensions.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(CoreError::Config(format!(
                "size must be a positive finite number, got {}",
                self.size
            )));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(CoreError::Config(format!(
                "margin must be a non-negative finite number, got {}",
                self.margin
            )));
        }
        if let Some(logo) = &self.logo {
            if !logo.opacity.is_finite() || !(0.0..=1.0).contains(&logo.opacity) {
                return Err(CoreError::Config(format!(
                    "logo opacity must lie in [0, 1], got {}",
                    logo.opacity
                )));
            }
            for dim in [logo.width, logo.height].into_iter().flatten() {
                if !dim.is_finite() || dim <= 0.0 {
                    return Err(CoreError::Config(format!(
                        "logo dimensions must be positive finite numbers, got {dim}"
                    )));
                }
            }
        }
        Ok(())
    }
}
