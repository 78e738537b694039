//! scancrop - Automatic content cropper for scanned page images
//!
//! Detects the content region of each scanned page by adaptive
//! local-contrast thresholding, computes a foreground bounding box,
//! applies a configurable margin, and writes the cropped result.
//! Directories of pages are processed in parallel.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use scancrop::{CropConfig, CropPipeline};
//! use std::path::Path;
//!
//! let pipeline = CropPipeline::new(CropConfig::default().with_margin(24));
//! let result = pipeline
//!     .process_file(Path::new("scan.png"), Path::new("cropped.png"))
//!     .unwrap();
//! println!("{}x{} -> {}x{}",
//!     result.original_size.0, result.original_size.1,
//!     result.cropped_size.0, result.cropped_size.1);
//! ```
//!
//! # Architecture
//!
//! The pipeline stages are independent and each consumes and produces a
//! [`PixelGrid`]:
//!
//! ```text
//! decode -> threshold -> bounds -> margin adjust -> crop -> encode
//! ```
//!
//! # License
//!
//! AGPL-3.0

pub mod batch;
pub mod bounds;
pub mod cli;
pub mod config;
pub mod crop;
pub mod grid;
pub mod pipeline;
pub mod threshold;

pub use batch::{collect_image_files, run_batch, BatchSummary};
pub use bounds::{find_bounds, Bounds, BoundsStrategy, ForegroundConvention};
pub use cli::{create_progress_bar, Cli, ExitCode};
pub use config::{CliOverrides, Config, ConfigError};
pub use crop::crop;
pub use grid::{clamped_index, Pixel, PixelGrid};
pub use pipeline::{
    apply_margin, CropConfig, CropPipeline, CropResult, PipelineError, DEFAULT_MARGIN,
};
pub use threshold::{threshold, DEFAULT_DIFF_RATIO};
