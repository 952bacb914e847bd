// Contour hierarchy extraction
// Traces the closed boundaries of a binary raster, keeps their parent
// links, and attaches a signed polygon area to each

use image::GrayImage;
use imageproc::contours::{find_contours, Contour};
use imageproc::point::Point;

/// All contours of one binary raster plus their nesting hierarchy
///
/// `contours[i].parent` indexes the immediately enclosing contour, `None`
/// for outermost boundaries. Areas are cached at extraction time.
pub struct ContourSet {
    pub contours: Vec<Contour<i32>>,
    areas: Vec<f64>,
}

impl ContourSet {
    /// Extract every closed boundary of the raster's foreground
    pub fn extract(binary: &GrayImage) -> Self {
        let contours = find_contours::<i32>(binary);
        let areas = contours
            .iter()
            .map(|c| shoelace_area(&c.points))
            .collect::<Vec<_>>();
        log::debug!("extracted {} contour(s)", contours.len());
        Self { contours, areas }
    }

    pub fn len(&self) -> usize {
        self.contours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Signed area of contour `i`; sign reflects traversal direction
    pub fn area(&self, i: usize) -> f64 {
        self.areas[i]
    }

    /// Index of the body contour: maximal |area|
    ///
    /// Ties go to the first contour in extraction order, which makes the
    /// selection deterministic and idempotent for an unmodified raster.
    pub fn body_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for i in 0..self.contours.len() {
            match best {
                Some(b) if self.areas[i].abs() <= self.areas[b].abs() => {}
                _ => best = Some(i),
            }
        }
        best
    }

    /// Contours immediately nested inside `parent` (direct children only)
    pub fn direct_children(&self, parent: usize) -> Vec<usize> {
        self.contours
            .iter()
            .enumerate()
            .filter(|(_, c)| c.parent == Some(parent))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Signed polygon area via the shoelace formula
pub fn shoelace_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..points.len() {
        let j = (i + 1) % points.len();
        sum += points[i].x as f64 * points[j].y as f64;
        sum -= points[j].x as f64 * points[i].y as f64;
    }
    sum / 2.0
}
