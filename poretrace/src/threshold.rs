// Binarization module
// Fixed-band manual thresholding and automatic Otsu splitting

use image::GrayImage;
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use poretrace_common::ThresholdBins;

/// Binarize with a caller-supplied intensity band
///
/// Pixels inside [lower, upper] become foreground (255), everything else
/// background (0). Deterministic; the bins come straight from configuration.
pub fn threshold_manual(gray: &GrayImage, bins: ThresholdBins) -> GrayImage {
    let mut binary = gray.clone();
    for px in binary.pixels_mut() {
        let v = px.0[0];
        px.0[0] = if v >= bins.lower && v <= bins.upper {
            255
        } else {
            0
        };
    }
    binary
}

/// Binarize with Otsu's method
///
/// Picks the global level minimizing intra-class intensity variance, then
/// thresholds. Accuracy degrades on non-bimodal histograms; that is a
/// documented limitation, not an error.
pub fn threshold_otsu(gray: &GrayImage) -> GrayImage {
    let level = otsu_level(gray);
    let binary = threshold(gray, level, ThresholdType::Binary);

    if is_degenerate(&binary) {
        // Non-fatal: the low-quality mask propagates and only hurts accuracy
        log::warn!(
            "otsu level {} produced a degenerate (empty or full) foreground",
            level
        );
    }

    binary
}

/// Whether a binary mask collapsed to an empty or full foreground
pub fn is_degenerate(binary: &GrayImage) -> bool {
    let foreground = binary.pixels().filter(|p| p.0[0] > 0).count();
    foreground == 0 || foreground == binary.pixels().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn manual_band_keeps_only_in_range_pixels() {
        let gray = GrayImage::from_fn(4, 1, |x, _| Luma([(x * 80) as u8]));
        let binary = threshold_manual(
            &gray,
            ThresholdBins {
                lower: 80,
                upper: 200,
            },
        );
        // intensities 0, 80, 160, 240
        assert_eq!(binary.get_pixel(0, 0).0[0], 0);
        assert_eq!(binary.get_pixel(1, 0).0[0], 255);
        assert_eq!(binary.get_pixel(2, 0).0[0], 255);
        assert_eq!(binary.get_pixel(3, 0).0[0], 0);
    }

    #[test]
    fn otsu_splits_a_bimodal_image() {
        let gray = GrayImage::from_fn(20, 10, |x, _| if x < 10 { Luma([30]) } else { Luma([220]) });
        let binary = threshold_otsu(&gray);
        assert_eq!(binary.get_pixel(0, 0).0[0], 0);
        assert_eq!(binary.get_pixel(19, 9).0[0], 255);
        assert!(!is_degenerate(&binary));
    }

    #[test]
    fn uniform_image_is_degenerate() {
        let gray = GrayImage::from_pixel(8, 8, Luma([40]));
        let binary = threshold_otsu(&gray);
        assert!(is_degenerate(&binary));
    }
}
