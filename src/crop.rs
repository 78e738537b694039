//! Sub-rectangle extraction
//!
//! Extracts a crop window from a color grid using the reference inclusion
//! rule: a source pixel `(x, y)` is copied iff `x1 < x <= x2` and
//! `y1 < y <= y2`. The rule is half-open on the low side, so the `x1`
//! column and `y1` row themselves are excluded and the output measures
//! exactly `(x2-x1) x (y2-y1)` pixels. A window with `x1 == x2` or
//! `y1 == y2` therefore yields an empty grid rather than an error.

use crate::grid::{Pixel, PixelGrid};

/// Crop `grid` to the window described by corners `(x1, y1)` and
/// `(x2, y2)` with `x1 <= x2`, `y1 <= y2`.
///
/// The source is walked in the grid's row-major scan order and the output
/// index advances with the same traversal, so source `(x, y)` lands at
/// output slot `(y - y1 - 1) * out_width + (x - x1 - 1)`.
pub fn crop(grid: &PixelGrid, x1: u32, y1: u32, x2: u32, y2: u32) -> PixelGrid {
    let out_width = x2.saturating_sub(x1);
    let out_height = y2.saturating_sub(y1);

    let mut pixels: Vec<Pixel> = Vec::with_capacity((out_width as usize) * (out_height as usize));

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            if x > x1 && x <= x2 && y > y1 && y <= y2 {
                pixels.push(grid.get(x as i64, y as i64));
            }
        }
    }

    PixelGrid::new(out_width, out_height, pixels)
}
