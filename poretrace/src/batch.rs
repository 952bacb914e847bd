// Batch orchestration
// One independent task per image on the rayon pool; per-image failures are
// recorded and skipped, and results keep the input enumeration order

use std::path::{Path, PathBuf};

use poretrace_common::{AnalyzerConfig, Measurement};
use rayon::prelude::*;

use crate::annotate;
use crate::error::{AnalysisError, Result};
use crate::pipeline;

/// Where the batch runner should put its side artifacts, if anywhere
pub struct BatchOptions<'a> {
    pub config: &'a AnalyzerConfig,
    /// Save annotated summary images into this directory
    pub summary_dir: Option<PathBuf>,
    /// Save intermediate masks into this directory
    pub debug_dir: Option<PathBuf>,
}

/// One successfully measured image
pub struct BatchRecord {
    pub sample: String,
    pub measurement: Measurement,
}

/// One image the pipeline gave up on
pub struct BatchFailure {
    pub sample: String,
    pub error: AnalysisError,
}

/// Outcome of a whole run; records preserve input order
pub struct BatchOutcome {
    pub records: Vec<BatchRecord>,
    pub failures: Vec<BatchFailure>,
}

/// Process a list of image files
///
/// Every image is an independent unit of work with no shared mutable
/// state, so the work fans out over the rayon pool; collecting the indexed
/// iterator reassembles results in input order without serializing the
/// processing itself. A failure only ever skips its own image.
pub fn run(paths: &[PathBuf], options: &BatchOptions) -> BatchOutcome {
    let results: Vec<(String, Result<Measurement>)> = paths
        .par_iter()
        .map(|path| {
            let sample = sample_name(path);
            println!("Processing {}", sample);
            (sample, process_one(path, options))
        })
        .collect();

    let mut records = Vec::new();
    let mut failures = Vec::new();
    for (sample, result) in results {
        match result {
            Ok(measurement) => records.push(BatchRecord {
                sample,
                measurement,
            }),
            Err(error) => {
                log::warn!("skipping {}: {}", sample, error);
                failures.push(BatchFailure { sample, error });
            }
        }
    }

    BatchOutcome { records, failures }
}

fn process_one(path: &Path, options: &BatchOptions) -> Result<Measurement> {
    let image = image::open(path)?.to_rgb8();
    let analysis = pipeline::analyze(&image, options.config)?;

    // side artifacts: a save failure is logged, never fatal, since the
    // measurement already exists
    if let Some(dir) = &options.summary_dir {
        let summary = annotate::draw_summary(&image, &analysis.contours, &analysis.breakdown);
        let target = artifact_path(dir, "summary", path);
        if let Err(err) = summary.save(&target) {
            log::warn!("could not save {}: {}", target.display(), err);
        }
    }
    if let Some(dir) = &options.debug_dir {
        for (tag, raster) in [
            ("mask", &analysis.sample_mask),
            ("sample_only", &analysis.sample_only),
        ] {
            let target = artifact_path(dir, tag, path);
            if let Err(err) = raster.save(&target) {
                log::warn!("could not save {}: {}", target.display(), err);
            }
        }
    }

    Ok(analysis.measurement)
}

fn artifact_path(dir: &Path, tag: &str, source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    dir.join(format!("{}_{}.png", tag, stem))
}

fn sample_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
