//! FAST-9 corner detection with intensity-centroid orientation.

use image::GrayImage;
use imageproc::corners::{corners_fast9, Corner};
use imageproc::suppress::local_maxima;

/// Radius of the patch used to estimate keypoint orientation
const ORIENTATION_RADIUS: i32 = 15;

/// A detected corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    pub x: u32,
    pub y: u32,
    /// Corner strength, higher is stronger
    pub response: f32,
    /// Dominant orientation in radians
    pub angle: f32,
}

/// FAST segment-test corner detector
#[derive(Debug, Clone)]
pub struct FastDetector {
    /// Minimum intensity difference for a circle pixel to count
    threshold: u8,
    /// Pixels closer than this to the image edge are never keypoints
    border: u32,
}

impl FastDetector {
    /// Create a detector. `border` must leave room for the descriptor patch.
    pub fn new(threshold: u8, border: u32) -> Self {
        Self {
            threshold,
            border: border.max(ORIENTATION_RADIUS as u32),
        }
    }

    /// Detect corners, strongest first.
    ///
    /// Ties are ordered by raster position so detection is deterministic.
    pub fn detect(&self, gray: &GrayImage) -> Vec<Keypoint> {
        let (width, height) = gray.dimensions();
        if width <= 2 * self.border || height <= 2 * self.border {
            return Vec::new();
        }

        let inside = |c: &Corner| {
            c.x >= self.border
                && c.y >= self.border
                && c.x < width - self.border
                && c.y < height - self.border
        };

        // 3x3 suppression over every corner, then drop the border band
        let mut corners: Vec<Corner> = local_maxima(&corners_fast9(gray, self.threshold), 1)
            .into_iter()
            .filter(inside)
            .collect();
        corners.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then(a.y.cmp(&b.y))
                .then(a.x.cmp(&b.x))
        });

        corners
            .into_iter()
            .map(|Corner { x, y, score }| Keypoint {
                x,
                y,
                response: score,
                angle: orientation(gray, x, y),
            })
            .collect()
    }
}

/// Intensity-centroid orientation of the disc around (x, y)
fn orientation(gray: &GrayImage, x: u32, y: u32) -> f32 {
    let (mut m01, mut m10) = (0i64, 0i64);
    for dy in -ORIENTATION_RADIUS..=ORIENTATION_RADIUS {
        for dx in -ORIENTATION_RADIUS..=ORIENTATION_RADIUS {
            if dx * dx + dy * dy > ORIENTATION_RADIUS * ORIENTATION_RADIUS {
                continue;
            }
            let value = gray.get_pixel((x as i32 + dx) as u32, (y as i32 + dy) as u32)[0] as i64;
            m10 += dx as i64 * value;
            m01 += dy as i64 * value;
        }
    }
    (m01 as f32).atan2(m10 as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma};

    fn square_on_black(size: u32, left: u32, top: u32, side: u32) -> GrayImage {
        ImageBuffer::from_fn(size, size, |x, y| {
            let inside = x >= left && x < left + side && y >= top && y < top + side;
            Luma([if inside { 230 } else { 20 }])
        })
    }

    #[test]
    fn flat_image_has_no_corners() {
        let flat = ImageBuffer::from_pixel(120, 120, Luma([128u8]));
        assert!(FastDetector::new(20, 20).detect(&flat).is_empty());
    }

    #[test]
    fn square_corners_are_detected() {
        let image = square_on_black(140, 40, 50, 50);
        let keypoints = FastDetector::new(20, 20).detect(&image);

        assert!(!keypoints.is_empty());
        for corner in [(40, 50), (89, 50), (40, 99), (89, 99)] {
            assert!(
                keypoints.iter().any(|k| k.x.abs_diff(corner.0) <= 2 && k.y.abs_diff(corner.1) <= 2),
                "no keypoint near corner {:?}",
                corner
            );
        }
    }

    #[test]
    fn straight_edges_are_not_corners() {
        let image = square_on_black(140, 40, 50, 50);
        let keypoints = FastDetector::new(20, 20).detect(&image);

        // Middle of the top edge
        assert!(!keypoints.iter().any(|k| k.x.abs_diff(65) <= 5 && k.y.abs_diff(50) <= 2));
    }

    #[test]
    fn keypoints_respect_border() {
        let image = square_on_black(100, 5, 5, 30);
        let keypoints = FastDetector::new(20, 20).detect(&image);

        assert!(keypoints
            .iter()
            .all(|k| k.x >= 20 && k.y >= 20 && k.x < 80 && k.y < 80));
    }

    #[test]
    fn too_small_image_yields_nothing() {
        let image = square_on_black(30, 10, 10, 10);
        assert!(FastDetector::new(20, 20).detect(&image).is_empty());
    }

    #[test]
    fn keypoints_are_sorted_by_response() {
        let image = square_on_black(140, 40, 50, 50);
        let keypoints = FastDetector::new(20, 20).detect(&image);

        assert!(keypoints.windows(2).all(|w| w[0].response >= w[1].response));
    }


    #[test]
    fn equal_responses_keep_raster_order() {
        // A symmetric square gives four corners of identical strength
        let image = square_on_black(140, 40, 40, 60);
        let keypoints = FastDetector::new(20, 20).detect(&image);

        for pair in keypoints.windows(2) {
            if pair[0].response == pair[1].response {
                assert!((pair[0].y, pair[0].x) < (pair[1].y, pair[1].x));
            }
        }
    }

    #[test]
    fn orientation_points_toward_brighter_side() {
        let image: GrayImage = ImageBuffer::from_fn(80, 80, |x, _| Luma([if x > 40 { 200 } else { 10 }]));
        let angle = orientation(&image, 40, 40);

        assert!(angle.abs() < 0.1, "angle was {angle}");
    }
}
