// Summary image annotation
// Draws the measured contours on a copy of the input for visual
// verification: body in white, pores in yellow

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use imageproc::point::Point;

use crate::contours::ContourSet;
use crate::measure::AreaBreakdown;

const BODY_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const PORE_COLOR: Rgb<u8> = Rgb([255, 255, 0]);

/// Render the body and pore contours onto a copy of the input image
///
/// Derived artifact only; measurement correctness never depends on it.
pub fn draw_summary(image: &RgbImage, contours: &ContourSet, breakdown: &AreaBreakdown) -> RgbImage {
    let mut summary = image.clone();

    for &i in &breakdown.pore_indices {
        draw_contour(&mut summary, &contours.contours[i].points, PORE_COLOR);
    }
    draw_contour(
        &mut summary,
        &contours.contours[breakdown.body_index].points,
        BODY_COLOR,
    );

    summary
}

/// Connect consecutive contour points, closing the loop at the end
fn draw_contour(image: &mut RgbImage, points: &[Point<i32>], color: Rgb<u8>) {
    match points {
        [] => {}
        [only] => {
            if only.x >= 0 && only.y >= 0 {
                let (x, y) = (only.x as u32, only.y as u32);
                if x < image.width() && y < image.height() {
                    image.put_pixel(x, y, color);
                }
            }
        }
        _ => {
            for pair in points.windows(2) {
                draw_line_segment_mut(
                    image,
                    (pair[0].x as f32, pair[0].y as f32),
                    (pair[1].x as f32, pair[1].y as f32),
                    color,
                );
            }
            let first = points[0];
            let last = points[points.len() - 1];
            draw_line_segment_mut(
                image,
                (last.x as f32, last.y as f32),
                (first.x as f32, first.y as f32),
                color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contours::ContourSet;
    use crate::measure;
    use image::{GrayImage, Luma};

    #[test]
    fn summary_marks_the_body_outline() {
        let raster = GrayImage::from_fn(20, 20, |x, y| {
            Luma([if (4..16).contains(&x) && (4..16).contains(&y) {
                255
            } else {
                0
            }])
        });
        let set = ContourSet::extract(&raster);
        let breakdown = measure::classify(&set).expect("body present");

        let input = RgbImage::from_pixel(20, 20, Rgb([10, 10, 10]));
        let summary = draw_summary(&input, &set, &breakdown);

        // a corner of the traced outline must be painted white
        let body = &set.contours[breakdown.body_index].points[0];
        assert_eq!(
            *summary.get_pixel(body.x as u32, body.y as u32),
            BODY_COLOR
        );
        // and untouched background keeps its original color
        assert_eq!(*summary.get_pixel(0, 0), Rgb([10, 10, 10]));
    }
}
