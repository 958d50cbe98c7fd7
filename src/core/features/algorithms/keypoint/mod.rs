//! Local keypoint features.
//!
//! The keypoint strategy works by:
//! 1. Converting to grayscale, shrinking very large images first
//! 2. Detecting FAST-9 corners and keeping the strongest `max_keypoints`
//! 3. Describing each corner with a 256-bit rotated BRIEF descriptor
//!
//! Two descriptor sets are compared by matching each descriptor of the
//! first set against its two nearest neighbours in the second and
//! applying a ratio test. The score is the accepted fraction of the
//! first set, so `score(a, b)` and `score(b, a)` generally differ.

mod descriptor;
mod detector;
mod matcher;

pub use descriptor::BriefPattern;
pub use detector::{FastDetector, Keypoint};
pub use matcher::ratio_test_score;

use crate::core::features::fast_resize::resize_to_grayscale;
use crate::core::features::traits::{FeatureVector, SimilarityStrategy, StrategyKind};
use crate::error::FeatureError;
use image::{DynamicImage, GrayImage};
use imageproc::filter::gaussian_blur_f32;

/// Keypoints closer than this to the edge cannot be described
pub const DESCRIPTOR_BORDER: u32 = 20;

/// Sigma of the Gaussian applied before sampling descriptor bits
const SMOOTHING_SIGMA: f32 = 2.0;

/// Keypoint descriptor strategy
pub struct KeypointStrategy {
    /// Maximum number of keypoints kept per image
    max_keypoints: usize,
    /// Ratio-test factor (best must be below `ratio` x second best)
    ratio: f32,
    /// Images with a longer side are shrunk to this before detection
    max_dimension: u32,
    detector: FastDetector,
    pattern: BriefPattern,
}

impl KeypointStrategy {
    /// Create a new keypoint strategy
    pub fn new(max_keypoints: usize, ratio: f32, max_dimension: u32, fast_threshold: u8) -> Self {
        Self {
            max_keypoints,
            ratio,
            max_dimension,
            detector: FastDetector::new(fast_threshold, DESCRIPTOR_BORDER),
            pattern: BriefPattern::new(),
        }
    }

    /// Grayscale working image, bounded by `max_dimension`
    fn prepare(&self, image: &DynamicImage) -> Result<GrayImage, FeatureError> {
        let (width, height) = (image.width(), image.height());
        let longest = width.max(height);
        if longest <= self.max_dimension {
            return Ok(image.to_luma8());
        }

        let scale = self.max_dimension as f64 / longest as f64;
        let target_width = ((width as f64 * scale).round() as u32).max(1);
        let target_height = ((height as f64 * scale).round() as u32).max(1);
        resize_to_grayscale(image, target_width, target_height)
    }
}

impl SimilarityStrategy for KeypointStrategy {
    fn extract_image(&self, image: &DynamicImage) -> Result<FeatureVector, FeatureError> {
        let gray = self.prepare(image)?;

        let mut keypoints = self.detector.detect(&gray);
        keypoints.truncate(self.max_keypoints);
        if keypoints.is_empty() {
            return Ok(FeatureVector::Keypoints(Vec::new()));
        }

        let smoothed = gaussian_blur_f32(&gray, SMOOTHING_SIGMA);
        let descriptors = keypoints
            .iter()
            .map(|keypoint| self.pattern.describe(&smoothed, keypoint))
            .collect();

        Ok(FeatureVector::Keypoints(descriptors))
    }

    fn score(&self, a: &FeatureVector, b: &FeatureVector) -> f64 {
        match (a, b) {
            (FeatureVector::Keypoints(a), FeatureVector::Keypoints(b)) => {
                ratio_test_score(a, b, self.ratio)
            }
            _ => 0.0,
        }
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Keypoint
    }
}
