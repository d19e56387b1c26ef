//! Module painters.
//!
//! Both styles walk the matrix once and push fills through the surface; the
//! fill colour is threaded through every call, never stored anywhere.

use qrpaint_core::geometry::{finder_cell_filled, finder_origins};
use qrpaint_core::{CellGrid, ModuleSource, Rgb};

use crate::surface::Surface;

/// Dot radius as a fraction of the half-cell radius. Empirically tuned for
/// the dotted look to stay machine-scannable; do not re-derive.
const DOT_RADIUS_RATIO: f64 = 0.75;

/// Paint every dark module as its exact cell rectangle.
pub(crate) fn squares<M: ModuleSource>(
    surface: &mut Surface,
    matrix: &M,
    grid: CellGrid,
    margin: f64,
    foreground: Rgb,
) {
    let side = matrix.side();
    for row in 0..side {
        let v = grid.span(row);
        for col in 0..side {
            if matrix.is_dark(row, col) {
                let h = grid.span(col);
                surface.fill_rect(h.origin + margin, v.origin + margin, h.extent, v.extent, foreground);
            }
        }
    }
}

/// Paint every dark module as an under-filled circle, then re-draw the three
/// finder patterns solid so scanners can still find the symbol.
pub(crate) fn dots<M: ModuleSource>(
    surface: &mut Surface,
    matrix: &M,
    grid: CellGrid,
    margin: f64,
    foreground: Rgb,
) {
    let side = matrix.side();
    let radius = grid.cell_size() / 2.0 * DOT_RADIUS_RATIO;
    for row in 0..side {
        let cy = grid.center(row) + margin;
        for col in 0..side {
            if matrix.is_dark(row, col) {
                surface.fill_circle(grid.center(col) + margin, cy, radius, foreground);
            }
        }
    }

    finder_patterns(surface, side, grid, margin, foreground);
}

/// Re-draw the three finder patterns as solid squares over the dot layer.
///
/// Walks the 9x9 halo around each pattern origin; cells that land outside
/// the matrix are skipped, never clamped. Only ring and core cells are
/// painted, so the annulus keeps whatever the background holds.
#[allow(clippy::cast_possible_wrap)]
fn finder_patterns(surface: &mut Surface, side: usize, grid: CellGrid, margin: f64, foreground: Rgb) {
    let bound = side as i64;
    for (row0, col0) in finder_origins(side) {
        for dr in -1..=7_i32 {
            let row = row0 as i64 + i64::from(dr);
            if row < 0 || row >= bound {
                continue;
            }
            for dc in -1..=7_i32 {
                let col = col0 as i64 + i64::from(dc);
                if col < 0 || col >= bound {
                    continue;
                }
                if !finder_cell_filled(dr, dc) {
                    continue;
                }
                #[allow(clippy::cast_sign_loss)]
                let (h, v) = (grid.span(col as usize), grid.span(row as usize));
                surface.fill_rect(h.origin + margin, v.origin + margin, h.extent, v.extent, foreground);
            }
        }
    }
}
