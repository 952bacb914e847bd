use serde::{Deserialize, Serialize};
use std::fmt;

/// How the second-pass binarization picks its threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ThresholdMode {
    /// Otsu's bimodal split computed from the image histogram
    Automatic,
    /// Fixed intensity band supplied by the caller
    Manual,
}

impl fmt::Display for ThresholdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdMode::Automatic => write!(f, "automatic (Otsu)"),
            ThresholdMode::Manual => write!(f, "manual"),
        }
    }
}

/// Intensity band for manual thresholding: pixels inside [lower, upper]
/// become foreground
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdBins {
    pub lower: u8,
    pub upper: u8,
}

impl Default for ThresholdBins {
    fn default() -> Self {
        Self {
            lower: 127,
            upper: 255,
        }
    }
}

/// Immutable configuration for one analyzer run
///
/// Owned by the caller and passed into the pipeline; the core never reads
/// process-wide state and never prompts interactively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub threshold_mode: ThresholdMode,
    pub manual_bins: ThresholdBins,
    /// Physical length represented by one pixel, in millimeters
    pub scale_mm_per_px: f64,
    /// Lowercase file extensions the batch runner will pick up
    pub accepted_extensions: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            threshold_mode: ThresholdMode::Automatic,
            manual_bins: ThresholdBins::default(),
            scale_mm_per_px: 0.002,
            accepted_extensions: ["tif", "tiff", "png", "jpg", "jpeg", "bmp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl AnalyzerConfig {
    /// Whether a file name has one of the accepted extensions
    /// (case-insensitive; files without an extension are rejected)
    pub fn accepts_file(&self, file_name: &str) -> bool {
        match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => {
                let ext = ext.to_ascii_lowercase();
                self.accepted_extensions.iter().any(|a| *a == ext)
            }
            _ => false,
        }
    }
}

/// Substrate boundary as y = slope * x + intercept over columns [0, W)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceLine {
    pub slope: f64,
    pub intercept: f64,
}

impl SurfaceLine {
    /// Fit the unique line through (0, y_left) and (width - 1, y_right)
    pub fn through_edge_rows(y_left: u32, y_right: u32, width: u32) -> Self {
        let run = (width.saturating_sub(1)).max(1) as f64;
        let slope = (y_right as f64 - y_left as f64) / run;
        Self {
            slope,
            intercept: y_left as f64,
        }
    }

    /// Surface row at column x
    pub fn y_at(&self, x: u32) -> f64 {
        self.slope * x as f64 + self.intercept
    }
}

/// Per-image porosity result in physical units
///
/// Created once per successfully processed image and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Solid body area (whole silhouette minus pores), mm²
    pub body_area_mm2: f64,
    /// Total area of enclosed pores, mm²
    pub pore_area_mm2: f64,
    /// pore area / whole silhouette area, dimensionless
    pub ratio: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_file_by_extension() {
        let config = AnalyzerConfig::default();
        assert!(config.accepts_file("sample_01.tif"));
        assert!(config.accepts_file("sample_01.TIF"));
        assert!(config.accepts_file("cross.section.png"));
        assert!(!config.accepts_file("notes.txt"));
        assert!(!config.accepts_file("no_extension"));
        assert!(!config.accepts_file(".tif"));
    }

    #[test]
    fn line_through_edge_rows() {
        let flat = SurfaceLine::through_edge_rows(10, 10, 200);
        assert_eq!(flat.slope, 0.0);
        assert_eq!(flat.intercept, 10.0);
        assert_eq!(flat.y_at(150), 10.0);

        let tilted = SurfaceLine::through_edge_rows(0, 100, 101);
        assert!((tilted.slope - 1.0).abs() < 1e-12);
        assert!((tilted.y_at(50) - 50.0).abs() < 1e-12);
    }
}
