//! scancrop - Automatic content cropper for scanned page images
//!
//! CLI entry point

use clap::Parser;
use scancrop::{
    collect_image_files, create_progress_bar, run_batch, Cli, CliOverrides, Config, CropPipeline,
    ExitCode,
};
use std::time::Instant;
use tracing::warn;
use tracing_subscriber::filter::LevelFilter;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    run(&cli).into()
}

/// Map `-v` counts onto tracing levels: warnings by default, up to
/// full trace output at `-vvv`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> ExitCode {
    let start_time = Instant::now();

    // Validate input directory
    if !cli.input.is_dir() {
        eprintln!(
            "Error: Input directory does not exist: {}",
            cli.input.display()
        );
        return ExitCode::InputNotFound;
    }

    let files = match collect_image_files(&cli.input) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error: Failed to read input directory: {}", e);
            return ExitCode::InputNotFound;
        }
    };
    if files.is_empty() {
        eprintln!(
            "Error: No image files found in {}",
            cli.input.display()
        );
        return ExitCode::InputNotFound;
    }

    if let Err(e) = std::fs::create_dir_all(&cli.output) {
        eprintln!(
            "Error: Cannot create output directory {}: {}",
            cli.output.display(),
            e
        );
        return ExitCode::OutputError;
    }

    // Load config file if specified, otherwise use the search path
    let file_config = match &cli.config {
        Some(config_path) => match Config::load_from_path(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Error: Failed to load config file: {}", e);
                return ExitCode::InvalidArgs;
            }
        },
        None => match Config::load() {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("failed to load config, using defaults: {}", e);
                Config::default()
            }
        },
    };

    let config = file_config.merge_with_cli(&create_cli_overrides(cli));

    // Size the global rayon pool before any parallel work starts
    if let Some(threads) = config.threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
        {
            warn!("failed to configure thread pool: {}", e);
        }
    }

    let progress = if cli.quiet {
        None
    } else {
        Some(create_progress_bar(files.len() as u64))
    };

    let pipeline = CropPipeline::new(config);
    let summary = run_batch(&pipeline, &files, &cli.output, progress.as_ref());

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    // Summary
    println!(
        "Processed {}/{} files ({} failed)",
        summary.succeeded(),
        summary.total,
        summary.failed.len()
    );
    for (path, error) in &summary.failed {
        eprintln!("  failed: {}: {}", path.display(), error);
    }
    println!("Total time: {:.2}s", start_time.elapsed().as_secs_f64());

    if summary.is_complete() {
        ExitCode::Success
    } else {
        ExitCode::ProcessingError
    }
}

/// Collect explicit CLI flags into override values (unset flags leave
/// the config file values in effect).
fn create_cli_overrides(cli: &Cli) -> CliOverrides {
    let mut overrides = CliOverrides::new();

    if let Some(margin) = cli.margin {
        overrides = overrides.with_margin(margin);
    }
    if let Some(threshold) = cli.threshold {
        overrides = overrides.with_threshold(threshold);
    }
    if let Some(strategy) = cli.strategy {
        overrides = overrides.with_strategy(strategy);
    }
    if let Some(foreground) = cli.foreground {
        overrides = overrides.with_foreground(foreground);
    }
    if cli.save_debug {
        overrides = overrides.with_save_debug(true);
    }
    if let Some(threads) = cli.threads {
        overrides = overrides.with_threads(threads);
    }

    overrides
}
