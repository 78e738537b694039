//! Foreground bounding-box detection
//!
//! Scans a binary grid and computes the axis-aligned rectangle enclosing
//! all foreground pixels. Two historical strategies exist and are kept as
//! explicit, selectable variants rather than blended:
//!
//! - [`BoundsStrategy::MinMax`] (default): track running min/max
//!   coordinates over every foreground pixel.
//! - [`BoundsStrategy::CornerDistance`]: for each image corner keep the
//!   closest foreground pixel, then take min/max over the four candidates.
//!   The two can disagree on non-convex or sparse foreground shapes.
//!
//! The foreground test reads only the red channel of the binary grid and
//! is itself a named convention ([`ForegroundConvention`]); the default
//! treats black pixels (red channel zero) as foreground, matching the
//! thresholder's output where black marks high local contrast.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::grid::{Pixel, PixelGrid};

/// Which binary color counts as foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ForegroundConvention {
    /// Black marks foreground: a pixel is content when its red channel is 0
    #[default]
    Black,
    /// White marks foreground: a pixel is content when its red channel is nonzero
    White,
}

impl ForegroundConvention {
    /// Foreground test for a single pixel
    pub fn is_foreground(self, pixel: Pixel) -> bool {
        match self {
            ForegroundConvention::Black => pixel.r == 0,
            ForegroundConvention::White => pixel.r != 0,
        }
    }
}

/// Bounding-box detection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BoundsStrategy {
    /// Running min/max over all foreground pixels
    #[default]
    MinMax,
    /// Closest foreground pixel to each of the four image corners
    CornerDistance,
}

/// Axis-aligned foreground bounding rectangle.
///
/// When no foreground pixel exists the box stays at its seed values
/// (`min_x = width > max_x = 0`, same for y) and [`Bounds::is_degenerate`]
/// reports true; downstream code must handle that explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl Bounds {
    /// Top-left corner `(min_x, min_y)`
    pub fn top_left(&self) -> (u32, u32) {
        (self.min_x, self.min_y)
    }

    /// Bottom-right corner `(max_x, max_y)`
    pub fn bottom_right(&self) -> (u32, u32) {
        (self.max_x, self.max_y)
    }

    /// True when the box is inverted, i.e. no foreground was found.
    pub fn is_degenerate(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }
}

/// Find the foreground bounding box of a binary grid.
pub fn find_bounds(
    grid: &PixelGrid,
    strategy: BoundsStrategy,
    foreground: ForegroundConvention,
) -> Bounds {
    match strategy {
        BoundsStrategy::MinMax => find_bounds_min_max(grid, foreground),
        BoundsStrategy::CornerDistance => find_bounds_corner_distance(grid, foreground),
    }
}

/// Min/max scan. Seeds are intentionally inverted (`min = dimension`,
/// `max = 0`) so an all-background grid yields a degenerate box.
fn find_bounds_min_max(grid: &PixelGrid, foreground: ForegroundConvention) -> Bounds {
    let width = grid.width();
    let height = grid.height();

    let mut min_x = width;
    let mut max_x = 0u32;
    let mut min_y = height;
    let mut max_y = 0u32;

    for y in 0..height {
        for x in 0..width {
            if foreground.is_foreground(grid.get(x as i64, y as i64)) {
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                min_y = min_y.min(y);
                max_y = max_y.max(y);
            }
        }
    }

    Bounds {
        min_x,
        min_y,
        max_x,
        max_y,
    }
}

/// Historical corner-distance scan: each image corner keeps the foreground
/// pixel with the smallest squared Euclidean distance to it; the box is the
/// min/max over the four candidates.
fn find_bounds_corner_distance(grid: &PixelGrid, foreground: ForegroundConvention) -> Bounds {
    let width = grid.width();
    let height = grid.height();

    let corners: [(u32, u32); 4] = [
        (0, 0),
        (width.saturating_sub(1), 0),
        (0, height.saturating_sub(1)),
        (width.saturating_sub(1), height.saturating_sub(1)),
    ];

    let mut candidates: [Option<(u32, u32)>; 4] = [None; 4];
    let mut best: [u64; 4] = [u64::MAX; 4];

    for y in 0..height {
        for x in 0..width {
            if !foreground.is_foreground(grid.get(x as i64, y as i64)) {
                continue;
            }
            for (i, (cx, cy)) in corners.iter().enumerate() {
                let dx = x as i64 - *cx as i64;
                let dy = y as i64 - *cy as i64;
                let dist = (dx * dx + dy * dy) as u64;
                if dist < best[i] {
                    best[i] = dist;
                    candidates[i] = Some((x, y));
                }
            }
        }
    }

    // No foreground at all: fall back to the same inverted seed box as the
    // min/max scan so both strategies degenerate identically.
    let mut min_x = width;
    let mut max_x = 0u32;
    let mut min_y = height;
    let mut max_y = 0u32;

    for candidate in candidates.iter().flatten() {
        let (x, y) = *candidate;
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    Bounds {
        min_x,
        min_y,
        max_x,
        max_y,
    }
}
