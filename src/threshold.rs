//! Adaptive local-contrast thresholding
//!
//! Converts a color grid into a strictly binary (black/white) grid by
//! comparing each pixel's brightness against the average brightness of its
//! eight neighbors. High relative contrast marks the pixel black.
//!
//! This is deliberately not a gradient edge detector (no Sobel/Canny):
//! the decision is a single relative-difference test per pixel, which is
//! enough to separate scanned content from a flat background.
//!
//! Every pixel's decision is independent, so the map runs data-parallel
//! over pixel indices with rayon; the collected output preserves index
//! order and no state is shared between pixels.

use rayon::prelude::*;

use crate::grid::{clamped_index, Pixel, PixelGrid};

/// Default relative-difference ratio. Tunable; useful values sit
/// roughly in the 0.6-0.9 range depending on scan contrast.
pub const DEFAULT_DIFF_RATIO: f64 = 0.8;

/// Additive epsilon keeping brightness denominators nonzero on
/// all-black neighborhoods.
const BRIGHTNESS_EPSILON: f64 = 0.001;

/// Offsets of the eight neighbors around a pixel.
const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Scalar brightness: mean of the channels plus a small epsilon.
fn brightness(pixel: Pixel) -> f64 {
    pixel.channel_mean() + BRIGHTNESS_EPSILON
}

/// Threshold a color grid into a binary grid of the same dimensions.
///
/// For each pixel, the eight neighbor positions are resolved through the
/// clamped flat index, so edge pixels reuse boundary pixels as synthetic
/// neighbors rather than wrapping or erroring. The output pixel is black
/// when `|avg - own| / avg > diff_ratio`, white otherwise.
pub fn threshold(grid: &PixelGrid, diff_ratio: f64) -> PixelGrid {
    let width = grid.width();
    let height = grid.height();

    let pixels: Vec<Pixel> = (0..grid.len())
        .into_par_iter()
        .map(|idx| {
            let x = (idx as u32 % width.max(1)) as i64;
            let y = (idx as u32 / width.max(1)) as i64;

            let neighbor_sum: f64 = NEIGHBOR_OFFSETS
                .iter()
                .map(|(dx, dy)| {
                    let nidx = clamped_index(width, height, x + dx, y + dy);
                    brightness(grid.at(nidx))
                })
                .sum();
            let avg = neighbor_sum / NEIGHBOR_OFFSETS.len() as f64;
            let own = brightness(grid.at(idx));

            let diff = (avg - own).abs() / avg;
            if diff > diff_ratio {
                Pixel::BLACK
            } else {
                Pixel::WHITE
            }
        })
        .collect();

    PixelGrid::new(width, height, pixels)
}
