//! CLI interface module
//!
//! Provides command-line interface using clap derive macros.

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use crate::bounds::{BoundsStrategy, ForegroundConvention};

/// Exit codes for the CLI
///
/// These codes follow standard Unix conventions and provide
/// specific error categories for scripting and automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Everything processed
    Success = 0,
    /// Unclassified error
    GeneralError = 1,
    /// Argument error
    InvalidArgs = 2,
    /// Input directory not found or empty
    InputNotFound = 3,
    /// Output error (write permission, disk full)
    OutputError = 4,
    /// One or more files failed during processing
    ProcessingError = 5,
}

impl ExitCode {
    /// Convert to process exit code
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Get human-readable description
    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::GeneralError => "General error",
            ExitCode::InvalidArgs => "Invalid arguments",
            ExitCode::InputNotFound => "Input directory not found or contains no images",
            ExitCode::OutputError => "Output error (permission denied, disk full, etc.)",
            ExitCode::ProcessingError => "Processing error",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.code()
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.code() as u8)
    }
}

/// Automatic content cropper for scanned page images
#[derive(Parser, Debug)]
#[command(name = "scancrop")]
#[command(version)]
#[command(about = "Detects page content and crops scanned images in batch", long_about = None)]
pub struct Cli {
    /// Input directory containing scanned images
    #[arg(default_value = "./input")]
    pub input: PathBuf,

    /// Output directory for cropped images
    #[arg(default_value = "./output")]
    pub output: PathBuf,

    /// Margin in pixels kept around the detected content
    #[arg(short, long)]
    pub margin: Option<u32>,

    /// Threshold ratio for content detection (relative brightness difference)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Bounding-box detection strategy
    #[arg(long, value_enum)]
    pub strategy: Option<BoundsStrategy>,

    /// Which binary color counts as content
    #[arg(long, value_enum)]
    pub foreground: Option<ForegroundConvention>,

    /// Save thresholded intermediates with a bounds overlay
    #[arg(long)]
    pub save_debug: bool,

    /// Number of parallel threads
    #[arg(long)]
    pub threads: Option<usize>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Get thread count (default to available CPUs)
    pub fn thread_count(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get)
    }
}

/// Create a styled progress bar for file processing
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )
            .expect("Invalid progress bar template")
            .progress_chars("#>-"),
    );
    pb
}
