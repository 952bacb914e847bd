// Sample mask construction
// Isolates the sample body (with its enclosed pores) from substrate and
// exterior background

use std::collections::VecDeque;

use image::{GrayImage, Luma};
use imageproc::filter::bilateral_filter;
use imageproc::morphology::{grayscale_close, Mask};
use poretrace_common::SurfaceLine;

use crate::error::Result;
use crate::{surface, threshold};

/// Build the sample mask for one grayscale raster
///
/// Foreground marks the sample body together with any pores it fully
/// encloses; substrate and exterior background are 0. Pores that touch the
/// surface line or break the outer silhouette are not guaranteed to stay
/// enclosed and may be lost to the background; that is an accepted accuracy
/// bound of the silhouette approach.
pub fn build_sample_mask(gray: &GrayImage) -> Result<GrayImage> {
    let blurred = heavy_blur(gray);
    let binary = threshold::threshold_otsu(&blurred);
    let line = surface::detect_surface_line(&binary)?;

    let region = above_surface_mask(&line, gray.width(), gray.height());
    let above = intersect(&binary, &region);

    let seed = exterior_seed(&line, gray.height());
    Ok(fill_exterior_and_invert(&above, seed))
}

/// Heavily smooth a raster so only the substrate/sample macro boundary
/// survives
///
/// Morphological closing erases small dark detail (pores, scratches); the
/// bilateral filter flattens the remaining texture while keeping the macro
/// edge sharp enough for the surface scan.
pub fn heavy_blur(gray: &GrayImage) -> GrayImage {
    let closed = grayscale_close(gray, &Mask::square(3));
    bilateral_filter(&closed, 9, 75.0, 75.0)
}

/// Region mask marking everything strictly above the surface line
///
/// For column x, rows above floor(slope * x + intercept) are foreground.
pub fn above_surface_mask(line: &SurfaceLine, width: u32, height: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    for x in 0..width {
        let cut = line.y_at(x).floor().clamp(0.0, height as f64) as u32;
        for y in 0..cut {
            mask.put_pixel(x, y, Luma([255]));
        }
    }
    mask
}

/// Pixelwise AND of two binary masks of identical dimensions
pub fn intersect(a: &GrayImage, b: &GrayImage) -> GrayImage {
    debug_assert_eq!(a.dimensions(), b.dimensions());
    let mut out = a.clone();
    for (px, other) in out.pixels_mut().zip(b.pixels()) {
        px.0[0] = if px.0[0] > 0 && other.0[0] > 0 { 255 } else { 0 };
    }
    out
}

/// Background point guaranteed to lie outside the sample silhouette
///
/// Column 0 at the surface row: the above-surface intersection leaves
/// everything at or below the line as background, so this seed is valid
/// even when material reaches the top image corner.
fn exterior_seed(line: &SurfaceLine, height: u32) -> (u32, u32) {
    let row = (line.y_at(0).floor().max(0.0) as u32).min(height - 1);
    (0, row)
}

/// Fill everything reachable from an exterior seed, then invert
///
/// Breadth-first fill over background pixels with 4-connectivity; the
/// returned mask is the complement of the filled region, i.e. the sample
/// silhouette with its enclosed pores as foreground.
pub fn fill_exterior_and_invert(mask: &GrayImage, seed: (u32, u32)) -> GrayImage {
    let (width, height) = mask.dimensions();
    let index = |x: u32, y: u32| (y * width + x) as usize;
    let mut exterior = vec![false; (width * height) as usize];

    debug_assert_eq!(
        mask.get_pixel(seed.0, seed.1).0[0],
        0,
        "flood fill seed must be a background pixel"
    );

    let mut queue = VecDeque::new();
    if mask.get_pixel(seed.0, seed.1).0[0] == 0 {
        exterior[index(seed.0, seed.1)] = true;
        queue.push_back(seed);
    }

    while let Some((x, y)) = queue.pop_front() {
        let mut visit = |nx: u32, ny: u32| {
            if mask.get_pixel(nx, ny).0[0] == 0 && !exterior[index(nx, ny)] {
                exterior[index(nx, ny)] = true;
                queue.push_back((nx, ny));
            }
        };
        if x > 0 {
            visit(x - 1, y);
        }
        if x + 1 < width {
            visit(x + 1, y);
        }
        if y > 0 {
            visit(x, y - 1);
        }
        if y + 1 < height {
            visit(x, y + 1);
        }
    }

    GrayImage::from_fn(width, height, |x, y| {
        if exterior[index(x, y)] {
            Luma([0])
        } else {
            Luma([255])
        }
    })
}
