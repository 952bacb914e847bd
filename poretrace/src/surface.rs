// Surface line detection
// Fits the substrate boundary from the first foreground pixel of the two
// edge columns of a binarized, heavily smoothed raster

use image::GrayImage;
use poretrace_common::SurfaceLine;

use crate::error::{AnalysisError, Result};

/// Detect the substrate boundary line
///
/// Scans column 0 and column W-1 top-to-bottom for their first foreground
/// pixel and fits the unique line through the two hits. The substrate is
/// assumed locally planar and must span the full image width; the heavy
/// smoothing applied upstream keeps pore and texture noise from producing
/// a spurious first hit.
pub fn detect_surface_line(binary: &GrayImage) -> Result<SurfaceLine> {
    let width = binary.width();
    if width == 0 || binary.height() == 0 {
        return Err(AnalysisError::SurfaceNotFound { column: 0 });
    }

    let y_left = first_foreground_row(binary, 0)?;
    let y_right = first_foreground_row(binary, width - 1)?;

    log::debug!(
        "surface line through (0, {}) and ({}, {})",
        y_left,
        width - 1,
        y_right
    );

    Ok(SurfaceLine::through_edge_rows(y_left, y_right, width))
}

/// Row of the first foreground pixel in a column, scanning top to bottom
fn first_foreground_row(binary: &GrayImage, column: u32) -> Result<u32> {
    (0..binary.height())
        .find(|&y| binary.get_pixel(column, y).0[0] > 0)
        .ok_or(AnalysisError::SurfaceNotFound { column })
}
