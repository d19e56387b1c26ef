//! Module matrix abstraction and the encoder adapter.
//!
//! The compositor never encodes anything itself; it consumes a square
//! dark/light matrix behind [`ModuleSource`]. [`encode`] adapts the `qrcode`
//! crate to that seam. The painters tolerate any positive side length even
//! though real symbols are always odd and at least 21.

use crate::config::EcLevel;
use crate::error::CoreResult;

/// A square matrix of dark/light modules produced by an encoder.
///
/// Implementations must be deterministic for identical inputs, and
/// `is_dark` must be cheap - the painters call it `side()²` times per
/// render without caching.
pub trait ModuleSource {
    /// Number of modules along one side.
    fn side(&self) -> usize;

    /// Whether the module at `(row, col)` is dark. Out-of-range coordinates
    /// read as light.
    fn is_dark(&self, row: usize, col: usize) -> bool;
}

/// Owned row-major bit matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    side: usize,
    bits: Vec<bool>,
}

impl BitMatrix {
    /// All-light matrix of the given side.
    #[must_use]
    pub fn new(side: usize) -> Self {
        Self {
            side,
            bits: vec![false; side * side],
        }
    }

    /// Build a matrix by sampling `f(row, col)`.
    #[must_use]
    pub fn from_fn(side: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut matrix = Self::new(side);
        for row in 0..side {
            for col in 0..side {
                if f(row, col) {
                    matrix.set(row, col, true);
                }
            }
        }
        matrix
    }

    /// Set the module at `(row, col)`. Out-of-range coordinates are ignored.
    pub fn set(&mut self, row: usize, col: usize, dark: bool) {
        if row < self.side && col < self.side {
            if let Some(bit) = self.bits.get_mut(row * self.side + col) {
                *bit = dark;
            }
        }
    }
}

impl ModuleSource for BitMatrix {
    fn side(&self) -> usize {
        self.side
    }

    fn is_dark(&self, row: usize, col: usize) -> bool {
        if row >= self.side || col >= self.side {
            return false;
        }
        self.bits.get(row * self.side + col).copied().unwrap_or(false)
    }
}

impl From<EcLevel> for qrcode::EcLevel {
    fn from(level: EcLevel) -> Self {
        match level {
            EcLevel::L => Self::L,
            EcLevel::M => Self::M,
            EcLevel::Q => Self::Q,
            EcLevel::H => Self::H,
        }
    }
}

/// Encode a payload into its module matrix at the given error-correction
/// level.
///
/// # Errors
///
/// Returns [`crate::CoreError::Encode`] when the payload does not fit any
/// symbol version at the requested level.
pub fn encode(payload: &[u8], level: EcLevel) -> CoreResult<BitMatrix> {
    let code = qrcode::QrCode::with_error_correction_level(payload, level.into())?;
    let side = code.width();
    let bits: Vec<bool> = code
        .to_colors()
        .into_iter()
        .map(|color| color == qrcode::Color::Dark)
        .collect();

    tracing::debug!(side, payload_len = payload.len(), "encoded module matrix");

    Ok(BitMatrix { side, bits })
}
