//! Rotated BRIEF binary descriptors.
//!
//! Each descriptor bit compares the smoothed intensity at two points of a
//! fixed sampling pattern, rotated by the keypoint orientation.

use crate::core::features::traits::{Descriptor, DESCRIPTOR_BYTES};
use super::detector::Keypoint;
use image::GrayImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Half-size of the 27x27 sampling patch; rotated by any angle it stays
/// within the descriptor border
const PATCH_RADIUS: i32 = 13;

/// Fixed seed so every run samples the same pattern
const PATTERN_SEED: u64 = 0x5EED_B81E_F000_0001;

/// The point pairs tested by every descriptor
#[derive(Debug, Clone)]
pub struct BriefPattern {
    pairs: Vec<[(f32, f32); 2]>,
}

impl BriefPattern {
    /// Generate the deterministic 256-pair sampling pattern
    pub fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(PATTERN_SEED);
        let mut sample = || {
            (
                rng.random_range(-PATCH_RADIUS..=PATCH_RADIUS) as f32,
                rng.random_range(-PATCH_RADIUS..=PATCH_RADIUS) as f32,
            )
        };

        let pairs = (0..DESCRIPTOR_BYTES * 8)
            .map(|_| [sample(), sample()])
            .collect();

        Self { pairs }
    }

    /// Compute the descriptor of `keypoint` on a smoothed image
    pub fn describe(&self, smoothed: &GrayImage, keypoint: &Keypoint) -> Descriptor {
        let (sin, cos) = keypoint.angle.sin_cos();
        let mut bytes = [0u8; DESCRIPTOR_BYTES];

        for (bit, [first, second]) in self.pairs.iter().enumerate() {
            let a = sample_rotated(smoothed, keypoint, *first, sin, cos);
            let b = sample_rotated(smoothed, keypoint, *second, sin, cos);
            if a < b {
                bytes[bit / 8] |= 1 << (bit % 8);
            }
        }

        Descriptor::new(bytes)
    }
}

impl Default for BriefPattern {
    fn default() -> Self {
        Self::new()
    }
}

fn sample_rotated(image: &GrayImage, keypoint: &Keypoint, (px, py): (f32, f32), sin: f32, cos: f32) -> u8 {
    let rx = (cos * px - sin * py).round() as i32;
    let ry = (sin * px + cos * py).round() as i32;

    let x = (keypoint.x as i32 + rx).clamp(0, image.width() as i32 - 1);
    let y = (keypoint.y as i32 + ry).clamp(0, image.height() as i32 - 1);
    image.get_pixel(x as u32, y as u32)[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma};

    fn keypoint(x: u32, y: u32, angle: f32) -> Keypoint {
        Keypoint {
            x,
            y,
            response: 1.0,
            angle,
        }
    }

    fn textured(size: u32) -> GrayImage {
        ImageBuffer::from_fn(size, size, |x, y| Luma([((x * 37 + y * 91) % 251) as u8]))
    }

    #[test]
    fn pattern_is_deterministic() {
        let image = textured(80);
        let point = keypoint(40, 40, 0.3);

        assert_eq!(
            BriefPattern::new().describe(&image, &point),
            BriefPattern::new().describe(&image, &point)
        );
    }

    #[test]
    fn pattern_has_256_pairs_inside_patch() {
        let pattern = BriefPattern::new();

        assert_eq!(pattern.pairs.len(), DESCRIPTOR_BYTES * 8);
        assert!(pattern.pairs.iter().flatten().all(|(x, y)| {
            x.abs() <= PATCH_RADIUS as f32 && y.abs() <= PATCH_RADIUS as f32
        }));
    }

    #[test]
    fn flat_patch_gives_zero_descriptor() {
        let flat = ImageBuffer::from_pixel(60, 60, Luma([90u8]));
        let descriptor = BriefPattern::new().describe(&flat, &keypoint(30, 30, 1.0));

        assert_eq!(descriptor, Descriptor::new([0; DESCRIPTOR_BYTES]));
    }

    #[test]
    fn different_patches_give_different_descriptors() {
        let image = textured(120);
        let pattern = BriefPattern::new();

        let a = pattern.describe(&image, &keypoint(40, 40, 0.0));
        let b = pattern.describe(&image, &keypoint(77, 61, 0.0));
        assert!(a.hamming(&b) > 0);
    }

    #[test]
    fn rotated_samples_stay_inside_descriptor_border() {
        let reach = (2.0f32).sqrt() * PATCH_RADIUS as f32;
        assert!(reach.round() < super::super::DESCRIPTOR_BORDER as f32);
    }

    #[test]
    fn sampling_near_edge_does_not_panic() {
        let image = textured(40);
        let _ = BriefPattern::new().describe(&image, &keypoint(1, 38, 2.5));
    }
}
