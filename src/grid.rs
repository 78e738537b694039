//! Pixel grid data model
//!
//! Provides the shared image representation used by every pipeline stage:
//! a flat row-major array of RGB pixels with clamped index access.
//!
//! Each stage (threshold, crop) builds a fresh grid and never mutates its
//! input, which is what makes per-file and per-pixel parallelism safe.

use image::{Rgb, RgbImage};

/// A single RGB pixel with 0-255 channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    /// Pure black
    pub const BLACK: Pixel = Pixel { r: 0, g: 0, b: 0 };

    /// Pure white
    pub const WHITE: Pixel = Pixel {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Create a pixel from channel values
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Mean of the three channels as a float
    pub fn channel_mean(&self) -> f64 {
        (self.r as f64 + self.g as f64 + self.b as f64) / 3.0
    }
}

impl From<Rgb<u8>> for Pixel {
    fn from(p: Rgb<u8>) -> Self {
        Pixel::new(p.0[0], p.0[1], p.0[2])
    }
}

impl From<Pixel> for Rgb<u8> {
    fn from(p: Pixel) -> Self {
        Rgb([p.r, p.g, p.b])
    }
}

/// Flat row-major index for `(x, y)`, clamped to `[0, width*height)`.
///
/// Out-of-range coordinates (including one-past-bounds neighbors at grid
/// edges and negative offsets) resolve to the first or last pixel instead
/// of wrapping or erroring. All neighbor lookups go through this function;
/// callers never branch on the grid edge themselves.
pub fn clamped_index(width: u32, height: u32, x: i64, y: i64) -> usize {
    let len = (width as i64) * (height as i64);
    if len == 0 {
        return 0;
    }
    let idx = y * width as i64 + x;
    idx.clamp(0, len - 1) as usize
}

/// Immutable-once-built RGB pixel grid.
///
/// `pixels.len() == width * height`, index = `y * width + x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl PixelGrid {
    /// Build a grid from a pre-filled pixel buffer.
    pub fn new(width: u32, height: u32, pixels: Vec<Pixel>) -> Self {
        debug_assert_eq!(pixels.len(), (width as usize) * (height as usize));
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Build a grid filled with a single color.
    pub fn filled(width: u32, height: u32, pixel: Pixel) -> Self {
        Self {
            width,
            height,
            pixels: vec![pixel; (width as usize) * (height as usize)],
        }
    }

    /// Decode a grid from an `image` crate RGB image.
    pub fn from_rgb_image(img: &RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.pixels().map(|p| Pixel::from(*p)).collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Encode the grid into an `image` crate RGB image.
    pub fn to_rgb_image(&self) -> RgbImage {
        let mut img = RgbImage::new(self.width, self.height);
        for (x, y, p) in img.enumerate_pixels_mut() {
            *p = Rgb::from(self.get(x as i64, y as i64));
        }
        img
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels in the grid
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Pixel at `(x, y)` via the clamped flat index.
    pub fn get(&self, x: i64, y: i64) -> Pixel {
        self.pixels[clamped_index(self.width, self.height, x, y)]
    }

    /// Pixel at a raw flat index (callers guarantee `idx < len`).
    pub fn at(&self, idx: usize) -> Pixel {
        self.pixels[idx]
    }

    /// Borrow the flat pixel buffer.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }
}
