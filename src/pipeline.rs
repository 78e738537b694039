//! Per-file crop pipeline
//!
//! Composes the processing stages for a single image:
//! decode -> threshold -> bounds -> margin adjust -> crop -> encode.
//!
//! Every stage works on immutable [`PixelGrid`]s, so `process_file` calls
//! for different files share no state and can run concurrently without
//! coordination. Failures are surfaced per file; batch-level isolation is
//! the caller's concern (see `batch`).

use image::Rgb;
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

use crate::bounds::{find_bounds, Bounds, BoundsStrategy, ForegroundConvention};
use crate::crop::crop;
use crate::grid::PixelGrid;
use crate::threshold::{threshold, DEFAULT_DIFF_RATIO};

/// Default margin in pixels added around the detected bounds.
pub const DEFAULT_MARGIN: u32 = 16;

/// Suffix inserted before the extension of the debug intermediate file.
const DEBUG_SUFFIX: &str = "bw";

/// Overlay color for the detected bounds in the debug image.
const DEBUG_RECT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Pipeline processing error
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Failed to decode image {0}: {1}")]
    Decode(PathBuf, String),

    #[error("Image has zero width or height: {0}")]
    ZeroDimension(PathBuf),

    #[error("No foreground content detected in {0}")]
    DegenerateBounds(PathBuf),

    #[error("Failed to encode image {0}: {1}")]
    Encode(PathBuf, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Crop pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropConfig {
    /// Margin in pixels around the detected bounds
    pub margin: u32,
    /// Adaptive threshold relative-difference ratio
    pub diff_ratio: f64,
    /// Bounding-box detection strategy
    pub strategy: BoundsStrategy,
    /// Which binary color counts as foreground
    pub foreground: ForegroundConvention,
    /// Write the thresholded intermediate with a bounds overlay
    pub save_debug: bool,
    /// Thread count (None = auto)
    pub threads: Option<usize>,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            diff_ratio: DEFAULT_DIFF_RATIO,
            strategy: BoundsStrategy::default(),
            foreground: ForegroundConvention::default(),
            save_debug: false,
            threads: None,
        }
    }
}

impl CropConfig {
    /// Builder pattern: set margin
    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    /// Builder pattern: set threshold ratio
    pub fn with_diff_ratio(mut self, ratio: f64) -> Self {
        self.diff_ratio = ratio;
        self
    }

    /// Builder pattern: set bounds strategy
    pub fn with_strategy(mut self, strategy: BoundsStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Builder pattern: set foreground convention
    pub fn with_foreground(mut self, foreground: ForegroundConvention) -> Self {
        self.foreground = foreground;
        self
    }

    /// Builder pattern: enable debug output
    pub fn with_save_debug(mut self, enabled: bool) -> Self {
        self.save_debug = enabled;
        self
    }
}

/// Result of processing a single file
#[derive(Debug, Clone)]
pub struct CropResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Source dimensions
    pub original_size: (u32, u32),
    /// Cropped output dimensions
    pub cropped_size: (u32, u32),
    /// Detected pre-margin bounds
    pub bounds: Bounds,
    /// Processing time in seconds
    pub elapsed_seconds: f64,
}

/// Expand `bounds` by `margin` pixels per side, asymmetrically clamped:
/// a side only moves when the move stays inside the image, otherwise it is
/// left where it was (never clamped to the boundary itself).
pub fn apply_margin(bounds: Bounds, margin: u32, width: u32, height: u32) -> Bounds {
    let min_x = if bounds.min_x > margin {
        bounds.min_x - margin
    } else {
        bounds.min_x
    };
    let max_x = if bounds.max_x + margin < width {
        bounds.max_x + margin
    } else {
        bounds.max_x
    };
    let min_y = if bounds.min_y > margin {
        bounds.min_y - margin
    } else {
        bounds.min_y
    };
    let max_y = if bounds.max_y + margin < height {
        bounds.max_y + margin
    } else {
        bounds.max_y
    };

    Bounds {
        min_x,
        min_y,
        max_x,
        max_y,
    }
}

/// Image crop pipeline
pub struct CropPipeline {
    config: CropConfig,
}

impl CropPipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: CropConfig) -> Self {
        Self { config }
    }

    /// Get the pipeline configuration
    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    /// Output path for `input` inside `output_dir` (same file name)
    pub fn get_output_path(&self, input: &Path, output_dir: &Path) -> PathBuf {
        let name = input.file_name().unwrap_or_default();
        output_dir.join(name)
    }

    /// Path of the debug intermediate for `output`:
    /// `page.png` -> `page.bw.png`
    pub fn get_debug_path(&self, output: &Path) -> PathBuf {
        let stem = output.file_stem().unwrap_or_default().to_string_lossy();
        let ext = output.extension().unwrap_or_default().to_string_lossy();
        let name = if ext.is_empty() {
            format!("{}.{}", stem, DEBUG_SUFFIX)
        } else {
            format!("{}.{}.{}", stem, DEBUG_SUFFIX, ext)
        };
        output.with_file_name(name)
    }

    /// Process a single image file: detect content bounds and write the
    /// cropped result to `output`.
    ///
    /// Exactly one output file is written on success (plus the `.bw`
    /// intermediate when `save_debug` is set). No retries: decode or
    /// detection failures are not transient.
    pub fn process_file(&self, input: &Path, output: &Path) -> Result<CropResult> {
        let start_time = Instant::now();

        if !input.exists() {
            return Err(PipelineError::InputNotFound(input.to_path_buf()));
        }

        let img = image::open(input)
            .map_err(|e| PipelineError::Decode(input.to_path_buf(), e.to_string()))?;
        let grid = PixelGrid::from_rgb_image(&img.to_rgb8());

        let (width, height) = (grid.width(), grid.height());
        if width == 0 || height == 0 {
            return Err(PipelineError::ZeroDimension(input.to_path_buf()));
        }
        debug!(input = %input.display(), width, height, "decoded");

        let binary = threshold(&grid, self.config.diff_ratio);
        let bounds = find_bounds(&binary, self.config.strategy, self.config.foreground);
        debug!(?bounds, "detected bounds");

        if bounds.is_degenerate() {
            return Err(PipelineError::DegenerateBounds(input.to_path_buf()));
        }

        if self.config.save_debug {
            self.write_debug_image(&binary, bounds, output)?;
        }

        let adjusted = apply_margin(bounds, self.config.margin, width, height);
        let cropped = crop(&grid, adjusted.min_x, adjusted.min_y, adjusted.max_x, adjusted.max_y);

        // A single-pixel detection collapses to a zero-area window under
        // the strict low-bound inclusion rule; the codec cannot encode it.
        if cropped.is_empty() {
            return Err(PipelineError::DegenerateBounds(input.to_path_buf()));
        }

        cropped
            .to_rgb_image()
            .save(output)
            .map_err(|e| PipelineError::Encode(output.to_path_buf(), e.to_string()))?;
        debug!(output = %output.display(), cropped_width = cropped.width(), cropped_height = cropped.height(), "written");

        Ok(CropResult {
            input_path: input.to_path_buf(),
            output_path: output.to_path_buf(),
            original_size: (width, height),
            cropped_size: (cropped.width(), cropped.height()),
            bounds,
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
        })
    }

    /// Write the thresholded intermediate with a hollow rectangle at the
    /// detected pre-margin bounds.
    fn write_debug_image(&self, binary: &PixelGrid, bounds: Bounds, output: &Path) -> Result<()> {
        let mut img = binary.to_rgb_image();
        let rect = Rect::at(bounds.min_x as i32, bounds.min_y as i32).of_size(
            bounds.max_x - bounds.min_x + 1,
            bounds.max_y - bounds.min_y + 1,
        );
        draw_hollow_rect_mut(&mut img, rect, DEBUG_RECT_COLOR);

        let debug_path = self.get_debug_path(output);
        img.save(&debug_path)
            .map_err(|e| PipelineError::Encode(debug_path.clone(), e.to_string()))?;
        debug!(debug_output = %debug_path.display(), "debug intermediate written");
        Ok(())
    }
}
