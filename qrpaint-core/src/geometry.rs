//! Module-to-pixel geometry.
//!
//! A QR symbol of `N` modules drawn at `size` logical pixels gives a cell
//! size of `size / N`, which is almost never an integer. Rounding each cell
//! to `round(cell)` pixels accumulates error across the symbol and opens
//! visible seams at large `N`; the mapper here instead rounds the cumulative
//! bounds of every cell, so the union of all spans along one axis tiles
//! `[0, size]` with no gap for any module count and any fractional cell size.

/// Side length of a finder pattern in modules.
pub const FINDER_SIDE: usize = 7;

/// One axis-aligned pixel span of a module cell, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    /// Left (or top) edge.
    pub origin: f64,
    /// Width (or height).
    pub extent: f64,
}

/// Maps module indices to pixel spans for one render.
#[derive(Debug, Clone, Copy)]
pub struct CellGrid {
    cell: f64,
}

#[allow(clippy::cast_precision_loss, clippy::trivially_copy_pass_by_ref)]
impl CellGrid {
    /// Grid for a symbol of `modules` cells drawn at `size` logical pixels.
    #[must_use]
    pub fn new(size: f64, modules: usize) -> Self {
        Self {
            cell: size / modules as f64,
        }
    }

    /// The (possibly fractional) cell side length.
    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cell
    }

    /// Left edge of cell `index`: `round(index * cell)`.
    #[must_use]
    pub fn origin(&self, index: usize) -> f64 {
        (index as f64 * self.cell).round()
    }

    /// Extent of cell `index`: `ceil((index + 1) * cell) - floor(index * cell)`.
    ///
    /// Rounding the cumulative bounds instead of the cell size keeps the
    /// spans gap-free; see the module docs.
    #[must_use]
    pub fn extent(&self, index: usize) -> f64 {
        ((index + 1) as f64 * self.cell).ceil() - (index as f64 * self.cell).floor()
    }

    /// Both edges of cell `index` at once.
    #[must_use]
    pub fn span(&self, index: usize) -> Span {
        Span {
            origin: self.origin(index),
            extent: self.extent(index),
        }
    }

    /// Center of cell `index`, measured from its rounded left edge.
    #[must_use]
    pub fn center(&self, index: usize) -> f64 {
        self.origin(index) + self.cell / 2.0
    }
}

/// Matrix origins `(row, col)` of the three finder patterns: top-left,
/// top-right, bottom-left.
///
/// Sides smaller than a finder pattern saturate to the origin; the painter's
/// bounds checks skip whatever falls outside the matrix.
#[must_use]
pub fn finder_origins(modules: usize) -> [(usize, usize); 3] {
    let far = modules.saturating_sub(FINDER_SIDE);
    [(0, 0), (0, far), (far, 0)]
}

/// Whether cell `(r, c)` of a finder pattern's 9x9 halo is painted solid.
///
/// Filled cells are the outer 7x7 ring plus the 3x3 core. The halo ring at
/// `-1` and `7` and the annulus between ring and core stay untouched, which
/// is what keeps the pattern hollow the way scanners expect.
#[must_use]
pub fn finder_cell_filled(r: i32, c: i32) -> bool {
    ((0..=6).contains(&r) && (c == 0 || c == 6))
        || ((0..=6).contains(&c) && (r == 0 || r == 6))
        || ((2..=4).contains(&r) && (2..=4).contains(&c))
}
