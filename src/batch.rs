//! Batch directory processing
//!
//! Collects image files from an input directory and runs the crop pipeline
//! over them with rayon. Files are fully independent, so the batch uses a
//! plain `par_iter` with per-file error isolation: one bad scan never
//! aborts the run, it lands in the summary's failure list instead.

use indicatif::ProgressBar;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::pipeline::{CropPipeline, CropResult};

/// Recognized raster extensions (lowercase, compared case-insensitively).
const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

/// Outcome of a batch run over one input directory.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Files attempted
    pub total: usize,
    /// Per-file results of successful crops, input order
    pub results: Vec<CropResult>,
    /// Failed inputs with their error messages, input order
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.results.len()
    }

    /// True when every attempted file produced an output
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Collect image files directly inside `dir`, sorted by path.
///
/// Non-image entries and subdirectories are skipped silently.
pub fn collect_image_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && has_image_extension(&path) {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
}

/// Process every file in `files` with `pipeline`, writing outputs into
/// `output_dir` under the same file names.
///
/// Runs data-parallel over files; the optional progress bar ticks once per
/// finished file regardless of outcome. Results come back in input order.
pub fn run_batch(
    pipeline: &CropPipeline,
    files: &[PathBuf],
    output_dir: &Path,
    progress: Option<&ProgressBar>,
) -> BatchSummary {
    let outcomes: Vec<(PathBuf, Result<CropResult, String>)> = files
        .par_iter()
        .map(|input| {
            let output = pipeline.get_output_path(input, output_dir);
            let outcome = pipeline
                .process_file(input, &output)
                .map_err(|e| e.to_string());

            if let Err(msg) = &outcome {
                warn!(input = %input.display(), error = %msg, "file failed");
            }
            if let Some(pb) = progress {
                pb.inc(1);
            }
            (input.clone(), outcome)
        })
        .collect();

    let mut summary = BatchSummary {
        total: files.len(),
        ..Default::default()
    };
    for (input, outcome) in outcomes {
        match outcome {
            Ok(result) => summary.results.push(result),
            Err(msg) => summary.failed.push((input, msg)),
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::CropConfig;
    use image::{Rgb, RgbImage};

    fn write_block_image(path: &Path) {
        let mut img = RgbImage::from_pixel(64, 64, Rgb([255, 255, 255]));
        for y in 16..48 {
            for x in 16..48 {
                img.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
        img.save(path).unwrap();
    }

    #[test]
    fn test_has_image_extension() {
        assert!(has_image_extension(Path::new("scan.png")));
        assert!(has_image_extension(Path::new("scan.JPG")));
        assert!(has_image_extension(Path::new("scan.Tiff")));
        assert!(!has_image_extension(Path::new("scan.pdf")));
        assert!(!has_image_extension(Path::new("scan.txt")));
        assert!(!has_image_extension(Path::new("noextension")));
    }

    #[test]
    fn test_collect_image_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.jpg", "notes.txt", "c.tiff"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let files = collect_image_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, ["a.jpg", "b.png", "c.tiff"]);
    }

    #[test]
    fn test_collect_image_files_missing_dir() {
        let result = collect_image_files(Path::new("/nonexistent/scans"));
        assert!(result.is_err());
    }

    #[test]
    fn test_run_batch_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        for name in ["p1.png", "p2.png", "p3.png"] {
            write_block_image(&dir.path().join(name));
        }

        let pipeline = CropPipeline::new(CropConfig::default());
        let files = collect_image_files(dir.path()).unwrap();
        let summary = run_batch(&pipeline, &files, out.path(), None);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded(), 3);
        assert!(summary.is_complete());
        for name in ["p1.png", "p2.png", "p3.png"] {
            assert!(out.path().join(name).exists());
        }
    }

    #[test]
    fn test_run_batch_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_block_image(&dir.path().join("good.png"));
        // Blank page: no foreground, so bounds detection fails for it
        RgbImage::from_pixel(32, 32, Rgb([255, 255, 255]))
            .save(dir.path().join("blank.png"))
            .unwrap();

        let pipeline = CropPipeline::new(CropConfig::default());
        let files = collect_image_files(dir.path()).unwrap();
        let summary = run_batch(&pipeline, &files, out.path(), None);

        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.failed.len(), 1);
        assert!(summary.failed[0].0.ends_with("blank.png"));
        assert!(out.path().join("good.png").exists());
        assert!(!out.path().join("blank.png").exists());
    }

    #[test]
    fn test_run_batch_preserves_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        for name in ["a.png", "b.png", "c.png", "d.png"] {
            write_block_image(&dir.path().join(name));
        }

        let pipeline = CropPipeline::new(CropConfig::default());
        let files = collect_image_files(dir.path()).unwrap();
        let summary = run_batch(&pipeline, &files, out.path(), None);

        let inputs: Vec<_> = summary.results.iter().map(|r| r.input_path.clone()).collect();
        assert_eq!(inputs, files);
    }

    #[test]
    fn test_run_batch_ticks_progress() {
        let dir = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_block_image(&dir.path().join("p1.png"));
        write_block_image(&dir.path().join("p2.png"));

        let pipeline = CropPipeline::new(CropConfig::default());
        let files = collect_image_files(dir.path()).unwrap();
        let pb = ProgressBar::hidden();
        pb.set_length(files.len() as u64);
        run_batch(&pipeline, &files, out.path(), Some(&pb));

        assert_eq!(pb.position(), 2);
    }

    #[test]
    fn test_run_batch_empty_file_list() {
        let out = tempfile::tempdir().unwrap();
        let pipeline = CropPipeline::new(CropConfig::default());
        let summary = run_batch(&pipeline, &[], out.path(), None);

        assert_eq!(summary.total, 0);
        assert!(summary.is_complete());
    }
}
