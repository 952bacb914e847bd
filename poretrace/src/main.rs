use anyhow::{bail, Context, Result};
use clap::Parser;
use poretrace_common::{AnalyzerConfig, ThresholdBins, ThresholdMode};
use std::fs;
use std::path::{Path, PathBuf};

use poretrace::batch::{self, BatchOptions};
use poretrace::export;

/// Measure cross-sectional porosity from photographs of samples sitting on
/// a flat substrate
#[derive(Parser, Debug)]
#[command(name = "poretrace")]
#[command(about = "Measure body and pore areas from sample cross-section images", long_about = None)]
struct Args {
    /// Directory containing the input images
    #[arg(short, long)]
    input: PathBuf,

    /// Directory for the results table and summary images
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Threshold selection for the second binarization pass
    #[arg(short, long, value_enum, default_value = "auto")]
    threshold: ThresholdArg,

    /// Lower manual threshold bin (with --threshold manual)
    #[arg(long, default_value_t = 127)]
    lower: u8,

    /// Upper manual threshold bin (with --threshold manual)
    #[arg(long, default_value_t = 255)]
    upper: u8,

    /// Physical length of one pixel, in millimeters
    #[arg(short, long, default_value_t = 0.002)]
    scale: f64,

    /// Comma-separated accepted file extensions
    #[arg(long, default_value = "tif,tiff,png,jpg,jpeg,bmp")]
    extensions: String,

    /// Save annotated summary images (body in white, pores in yellow)
    #[arg(long)]
    summary_images: bool,

    /// Save intermediate masks for troubleshooting
    #[arg(short, long)]
    debug: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ThresholdArg {
    Auto,
    Manual,
}

impl From<ThresholdArg> for ThresholdMode {
    fn from(arg: ThresholdArg) -> Self {
        match arg {
            ThresholdArg::Auto => ThresholdMode::Automatic,
            ThresholdArg::Manual => ThresholdMode::Manual,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    if args.lower > args.upper {
        bail!(
            "manual bins are inverted: lower {} > upper {}",
            args.lower,
            args.upper
        );
    }
    if !(args.scale > 0.0) {
        bail!("scale must be a positive length per pixel, got {}", args.scale);
    }

    let config = AnalyzerConfig {
        threshold_mode: args.threshold.into(),
        manual_bins: ThresholdBins {
            lower: args.lower,
            upper: args.upper,
        },
        scale_mm_per_px: args.scale,
        accepted_extensions: args
            .extensions
            .split(',')
            .map(|e| e.trim().to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect(),
    };

    println!("PoreTrace - Cross-Section Porosity Analyzer");
    println!("===========================================");
    println!("Input: {}", args.input.display());
    println!("Output: {}", args.output.display());
    println!("Threshold: {}", config.threshold_mode);
    if config.threshold_mode == ThresholdMode::Manual {
        println!("Manual bins: [{}, {}]", args.lower, args.upper);
    }
    println!("Scale: {} mm/px", config.scale_mm_per_px);
    println!();

    let files = collect_input_files(&args.input, &config)?;
    if files.is_empty() {
        bail!(
            "no images with extensions [{}] found in {}",
            config.accepted_extensions.join(", "),
            args.input.display()
        );
    }
    println!("Found {} image(s)", files.len());

    fs::create_dir_all(&args.output)
        .with_context(|| format!("could not create output directory {}", args.output.display()))?;

    let options = BatchOptions {
        config: &config,
        summary_dir: args.summary_images.then(|| args.output.clone()),
        debug_dir: args.debug.then(|| args.output.join("debug")),
    };
    if let Some(dir) = &options.debug_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("could not create debug directory {}", dir.display()))?;
    }

    let outcome = batch::run(&files, &options);

    println!();
    for record in &outcome.records {
        let m = &record.measurement;
        println!("{}", record.sample);
        println!("  area of body  = {:.6} mm²", m.body_area_mm2);
        println!("  area of pores = {:.6} mm²", m.pore_area_mm2);
        println!("  ratio         = {:.6}", m.ratio);
    }

    export::export_csv(&outcome.records, &args.output.join("areas.csv"))?;

    if !outcome.failures.is_empty() {
        println!();
        println!("number of issues: {}", outcome.failures.len());
        for failure in &outcome.failures {
            println!("  {}: {}", failure.sample, failure.error);
        }
    }

    println!();
    println!("Done processing!");
    Ok(())
}

/// Collect accepted image files from the input directory, sorted by name
/// for a stable enumeration order
fn collect_input_files(dir: &Path, config: &AnalyzerConfig) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("could not read input directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if config.accepts_file(&name) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
