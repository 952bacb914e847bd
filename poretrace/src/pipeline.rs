// Per-image analysis pipeline
// Strictly linear: sample mask -> second thresholding -> contour
// hierarchy -> measurement; one terminal success/failure outcome per image

use image::{GrayImage, RgbImage};
use imageproc::filter::gaussian_blur_f32;
use poretrace_common::{AnalyzerConfig, Measurement, ThresholdMode};

use crate::contours::ContourSet;
use crate::error::Result;
use crate::measure::{self, AreaBreakdown};
use crate::{mask, threshold};

/// Everything the pipeline produces for one image
///
/// The measurement is the deliverable; the contour set, breakdown and
/// intermediate masks are kept so the caller can render summary and debug
/// rasters without re-running any stage.
pub struct Analysis {
    pub measurement: Measurement,
    pub contours: ContourSet,
    pub breakdown: AreaBreakdown,
    /// Sample silhouette: body plus enclosed pores
    pub sample_mask: GrayImage,
    /// The raster the contours were traced on (silhouette ∩ threshold)
    pub sample_only: GrayImage,
}

/// Run the segmentation-and-measurement pipeline on one image
pub fn analyze(image: &RgbImage, config: &AnalyzerConfig) -> Result<Analysis> {
    let gray = image::imageops::grayscale(image);
    analyze_gray(&gray, config)
}

/// Pipeline entry for an already grayscale raster
pub fn analyze_gray(gray: &GrayImage, config: &AnalyzerConfig) -> Result<Analysis> {
    let sample_mask = mask::build_sample_mask(gray)?;
    let (sample_only, contours, breakdown) = trace_sample(gray, &sample_mask, config)?;
    let measurement = measure::to_measurement(&breakdown, config.scale_mm_per_px);

    log::debug!(
        "body {:.1} px², pores {:.1} px² across {} contour(s)",
        breakdown.whole_area_px - breakdown.pore_area_px,
        breakdown.pore_area_px,
        contours.len()
    );

    Ok(Analysis {
        measurement,
        contours,
        breakdown,
        sample_mask,
        sample_only,
    })
}

/// Measure a raster against an already built sample mask
pub fn measure_masked(
    gray: &GrayImage,
    sample_mask: &GrayImage,
    config: &AnalyzerConfig,
) -> Result<Measurement> {
    let (_, _, breakdown) = trace_sample(gray, sample_mask, config)?;
    Ok(measure::to_measurement(&breakdown, config.scale_mm_per_px))
}

/// Second, independent thresholding of the lightly blurred original,
/// restricted to the silhouette, then contour classification
///
/// The heavy blur inside the mask builder was only ever for the
/// silhouette; pores are traced from this gentler pass.
fn trace_sample(
    gray: &GrayImage,
    sample_mask: &GrayImage,
    config: &AnalyzerConfig,
) -> Result<(GrayImage, ContourSet, AreaBreakdown)> {
    let blurred = gaussian_blur_f32(gray, 2.0);
    let binary = match config.threshold_mode {
        ThresholdMode::Automatic => threshold::threshold_otsu(&blurred),
        ThresholdMode::Manual => threshold::threshold_manual(&blurred, config.manual_bins),
    };
    let sample_only = mask::intersect(&binary, sample_mask);

    let contours = ContourSet::extract(&sample_only);
    let breakdown = measure::classify(&contours)?;
    Ok((sample_only, contours, breakdown))
}
