// Area measurement
// Classifies pore contours by hierarchy membership and converts pixel
// areas to physical units

use poretrace_common::Measurement;

use crate::contours::ContourSet;
use crate::error::{AnalysisError, Result};

/// Pixel-space area breakdown of one contour set
#[derive(Debug, Clone)]
pub struct AreaBreakdown {
    pub body_index: usize,
    pub pore_indices: Vec<usize>,
    /// Area enclosed by the body contour, pores included, px²
    pub whole_area_px: f64,
    /// Summed area of the pore contours, px²
    pub pore_area_px: f64,
}

/// Select the body contour and the pores directly nested inside it
///
/// Only immediate children of the body count as pores: deeper descendants
/// (material islands inside a pore, and their holes) and sibling contours
/// are artifacts, not porosity. This rule decides what the final numbers
/// mean, so it is pinned by tests.
pub fn classify(set: &ContourSet) -> Result<AreaBreakdown> {
    let body_index = set.body_index().ok_or(AnalysisError::DegenerateMask)?;
    let whole_area_px = set.area(body_index).abs();
    if whole_area_px == 0.0 {
        return Err(AnalysisError::DegenerateMask);
    }

    let pore_indices = set.direct_children(body_index);
    let pore_area_px = pore_indices.iter().map(|&i| set.area(i).abs()).sum();

    Ok(AreaBreakdown {
        body_index,
        pore_indices,
        whole_area_px,
        pore_area_px,
    })
}

/// Convert a pixel breakdown into physical units
///
/// Pixel areas scale with the square of the length-per-pixel factor. The
/// ratio is pore over the whole silhouette (not over the solid body), so
/// it is independent of the scale factor.
pub fn to_measurement(breakdown: &AreaBreakdown, scale_mm_per_px: f64) -> Measurement {
    let scale2 = scale_mm_per_px * scale_mm_per_px;
    let whole_area = breakdown.whole_area_px * scale2;
    let pore_area = breakdown.pore_area_px * scale2;

    Measurement {
        body_area_mm2: whole_area - pore_area,
        pore_area_mm2: pore_area,
        ratio: breakdown.pore_area_px / breakdown.whole_area_px,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contours::ContourSet;
    use image::{GrayImage, Luma};

    /// Block with one hole; the hole contains an island which itself has a
    /// hole, so the hierarchy is three levels deep below the body
    fn deeply_nested() -> GrayImage {
        GrayImage::from_fn(32, 32, |x, y| {
            let block = (2..30).contains(&x) && (2..30).contains(&y);
            let hole = (6..26).contains(&x) && (6..26).contains(&y);
            let island = (10..22).contains(&x) && (10..22).contains(&y);
            let island_hole = (14..18).contains(&x) && (14..18).contains(&y);
            let solid = (block && !hole) || (island && !island_hole);
            Luma([if solid { 255 } else { 0 }])
        })
    }

    #[test]
    fn only_direct_children_count_as_pores() {
        let set = ContourSet::extract(&deeply_nested());
        let breakdown = classify(&set).expect("body present");

        assert_eq!(
            breakdown.pore_indices.len(),
            1,
            "only the first-level hole is a pore"
        );
        let pore = breakdown.pore_indices[0];
        assert_eq!(set.contours[pore].parent, Some(breakdown.body_index));

        // the island (two levels down) and its hole (three levels down)
        // exist in the hierarchy but are excluded from the pore set
        assert!(set.len() >= 4);
        assert!(breakdown.pore_area_px < breakdown.whole_area_px);
    }

    #[test]
    fn solid_body_has_zero_ratio() {
        let solid = GrayImage::from_fn(16, 16, |x, y| {
            Luma([if (4..12).contains(&x) && (4..12).contains(&y) {
                255
            } else {
                0
            }])
        });
        let set = ContourSet::extract(&solid);
        let breakdown = classify(&set).expect("body present");
        assert!(breakdown.pore_indices.is_empty());

        let m = to_measurement(&breakdown, 0.5);
        assert_eq!(m.pore_area_mm2, 0.0);
        assert_eq!(m.ratio, 0.0);
        assert!(m.body_area_mm2 > 0.0);
    }

    #[test]
    fn empty_raster_is_degenerate() {
        let empty = GrayImage::new(16, 16);
        let set = ContourSet::extract(&empty);
        assert!(matches!(classify(&set), Err(AnalysisError::DegenerateMask)));
    }

    #[test]
    fn ratio_is_pore_over_whole() {
        let breakdown = AreaBreakdown {
            body_index: 0,
            pore_indices: vec![1],
            whole_area_px: 400.0,
            pore_area_px: 100.0,
        };
        let m = to_measurement(&breakdown, 1.0);
        assert_eq!(m.ratio, 100.0 / 400.0);
        // pore / body would be 1/3; the canonical definition divides by
        // the whole silhouette
        assert!(m.ratio < 100.0 / 300.0);
        assert_eq!(m.body_area_mm2, 300.0);
    }

    #[test]
    fn areas_follow_the_scale_square_law() {
        let breakdown = AreaBreakdown {
            body_index: 0,
            pore_indices: vec![1, 2],
            whole_area_px: 1000.0,
            pore_area_px: 150.0,
        };
        let base = to_measurement(&breakdown, 0.002);
        let doubled = to_measurement(&breakdown, 0.004);

        assert!((doubled.body_area_mm2 - 4.0 * base.body_area_mm2).abs() < 1e-12);
        assert!((doubled.pore_area_mm2 - 4.0 * base.pore_area_mm2).abs() < 1e-12);
        assert_eq!(doubled.ratio, base.ratio);
    }
}
