//! Global colour histogram features.
//!
//! The histogram strategy works by:
//! 1. Resizing the image to a canonical square (64x64 by default)
//! 2. Building an L1-normalized histogram per RGB channel
//! 3. Appending per-channel mean and standard deviation, scaled to [0, 1]
//!
//! Because of the canonical resize the vector length only depends on the
//! bin count, so any two vectors from the same strategy can be compared
//! with cosine similarity.

use crate::core::features::fast_resize::resize_to_rgb;
use crate::core::features::traits::{FeatureVector, SimilarityStrategy, StrategyKind};
use crate::error::FeatureError;
use image::{DynamicImage, RgbImage};

const CHANNELS: usize = 3;

/// Colour histogram strategy
pub struct HistogramStrategy {
    /// Side length of the canonical square the image is resized to
    canonical_size: u32,
    /// Histogram bins per channel (1-256)
    bins: usize,
}

impl HistogramStrategy {
    /// Create a new histogram strategy
    pub fn new(canonical_size: u32, bins: usize) -> Self {
        Self {
            canonical_size,
            bins,
        }
    }

    /// Length of every non-empty vector this strategy produces
    pub fn vector_len(&self) -> usize {
        self.bins * CHANNELS + 2 * CHANNELS
    }

    /// Build the feature vector for an already-normalized RGB image
    pub fn features_from_rgb(&self, rgb: &RgbImage) -> Vec<f32> {
        let mut histograms = vec![vec![0u32; self.bins]; CHANNELS];
        let mut sums = [0f64; CHANNELS];
        let mut squares = [0f64; CHANNELS];

        for pixel in rgb.pixels() {
            for channel in 0..CHANNELS {
                let value = pixel[channel];
                histograms[channel][value as usize * self.bins / 256] += 1;
                sums[channel] += value as f64;
                squares[channel] += (value as f64) * (value as f64);
            }
        }

        let pixel_count = (rgb.width() as f64) * (rgb.height() as f64);
        let mut features = Vec::with_capacity(self.vector_len());

        for histogram in &histograms {
            features.extend(histogram.iter().map(|&count| (count as f64 / pixel_count) as f32));
        }

        let means: Vec<f64> = sums.iter().map(|sum| sum / pixel_count).collect();
        features.extend(means.iter().map(|mean| (mean / 255.0) as f32));

        for channel in 0..CHANNELS {
            let variance = (squares[channel] / pixel_count - means[channel] * means[channel]).max(0.0);
            features.push((variance.sqrt() / 255.0) as f32);
        }

        features
    }
}

impl SimilarityStrategy for HistogramStrategy {
    fn extract_image(&self, image: &DynamicImage) -> Result<FeatureVector, FeatureError> {
        let rgb = resize_to_rgb(image, self.canonical_size, self.canonical_size)?;
        Ok(FeatureVector::Histogram(self.features_from_rgb(&rgb)))
    }

    fn score(&self, a: &FeatureVector, b: &FeatureVector) -> f64 {
        match (a, b) {
            (FeatureVector::Histogram(a), FeatureVector::Histogram(b)) => cosine_score(a, b),
            _ => 0.0,
        }
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Histogram
    }
}

/// Cosine similarity remapped from [-1, 1] to [0, 1].
///
/// Empty, mismatched-length or zero-norm inputs score 0.0.
pub fn cosine_score(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0f64, 0f64, 0f64);
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let cosine = dot / (norm_a.sqrt() * norm_b.sqrt());
    if !cosine.is_finite() {
        return 0.0;
    }

    ((cosine + 1.0) / 2.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn strategy() -> HistogramStrategy {
        HistogramStrategy::new(64, 64)
    }

    fn create_gradient(width: u32, height: u32) -> DynamicImage {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([
                (x * 255 / (width - 1)) as u8,
                (y * 255 / (height - 1)) as u8,
                ((x + y) * 255 / (width + height - 2)) as u8,
            ])
        });
        DynamicImage::ImageRgb8(img)
    }

    fn create_solid(r: u8, g: u8, b: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_pixel(80, 60, Rgb([r, g, b])))
    }

    #[test]
    fn vector_length_is_independent_of_resolution() {
        let strategy = strategy();
        let small = strategy.extract_image(&create_gradient(32, 20)).unwrap();
        let large = strategy.extract_image(&create_gradient(640, 480)).unwrap();

        assert_eq!(small.len(), 198);
        assert_eq!(large.len(), 198);
    }

    #[test]
    fn histograms_are_l1_normalized() {
        let strategy = strategy();
        let FeatureVector::Histogram(values) = strategy.extract_image(&create_gradient(100, 100)).unwrap() else {
            panic!("expected histogram features");
        };

        for channel in 0..3 {
            let sum: f32 = values[channel * 64..(channel + 1) * 64].iter().sum();
            assert!((sum - 1.0).abs() < 1e-4, "channel {} sums to {}", channel, sum);
        }
    }

    #[test]
    fn solid_colour_statistics() {
        let strategy = strategy();
        let values = strategy.features_from_rgb(&ImageBuffer::from_pixel(64, 64, Rgb([255, 0, 51])));

        // Each channel falls in exactly one bin
        assert_eq!(values[63], 1.0);
        assert_eq!(values[64], 1.0);
        assert_eq!(values[128 + 12], 1.0);

        // Means scaled into [0, 1], zero spread
        assert!((values[192] - 1.0).abs() < 1e-6);
        assert!(values[193].abs() < 1e-6);
        assert!((values[194] - 0.2).abs() < 1e-6);
        assert!(values[195..].iter().all(|std| std.abs() < 1e-6));
    }

    #[test]
    fn self_similarity_is_maximal() {
        let strategy = strategy();
        let features = strategy.extract_image(&create_gradient(120, 90)).unwrap();

        let score = strategy.score(&features, &features);
        assert!((score - 1.0).abs() < 1e-9, "self score was {}", score);
    }

    #[test]
    fn score_is_symmetric() {
        let strategy = strategy();
        let a = strategy.extract_image(&create_gradient(120, 90)).unwrap();
        let b = strategy.extract_image(&create_solid(20, 200, 90)).unwrap();

        assert_eq!(strategy.score(&a, &b), strategy.score(&b, &a));
    }

    #[test]
    fn different_images_score_lower() {
        let strategy = strategy();
        let a = strategy.extract_image(&create_gradient(120, 90)).unwrap();
        let b = strategy.extract_image(&create_solid(250, 10, 10)).unwrap();

        assert!(strategy.score(&a, &b) < 0.95);
    }

    #[test]
    fn zero_norm_scores_zero() {
        let zeros = vec![0.0f32; 198];
        let ones = vec![1.0f32; 198];

        assert_eq!(cosine_score(&zeros, &ones), 0.0);
        assert_eq!(cosine_score(&ones, &zeros), 0.0);
    }

    #[test]
    fn empty_input_scores_zero() {
        let strategy = strategy();
        let features = strategy.extract_image(&create_gradient(50, 50)).unwrap();
        let empty = FeatureVector::empty(StrategyKind::Histogram);

        assert_eq!(strategy.score(&features, &empty), 0.0);
        assert_eq!(strategy.score(&empty, &features), 0.0);
        assert_eq!(strategy.score(&empty, &empty), 0.0);
    }

    #[test]
    fn opposite_vectors_score_zero() {
        // cos rounds to just above -1
        assert!(cosine_score(&[1.0, -2.0], &[-1.0, 2.0]) < 1e-12);
    }

    #[test]
    fn mismatched_kinds_score_zero() {
        let strategy = strategy();
        let features = strategy.extract_image(&create_gradient(50, 50)).unwrap();
        let keypoints = FeatureVector::Keypoints(Vec::new());

        assert_eq!(strategy.score(&features, &keypoints), 0.0);
    }

    #[test]
    fn corrupt_bytes_yield_empty_vector() {
        let strategy = strategy();

        assert!(strategy.extract(b"not an image").is_empty());
        assert!(strategy.extract(&[]).is_empty());
    }

    #[test]
    fn kind_returns_histogram() {
        assert_eq!(strategy().kind(), StrategyKind::Histogram);
    }
}
