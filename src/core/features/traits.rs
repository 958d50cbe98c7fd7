//! Trait definitions for feature extraction and scoring.

use super::fast_decode::FastDecoder;
use crate::error::FeatureError;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Size of a binary keypoint descriptor in bytes (256 bits)
pub const DESCRIPTOR_BYTES: usize = 32;

/// A 256-bit binary descriptor of the patch around one keypoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Descriptor([u8; DESCRIPTOR_BYTES]);

impl Descriptor {
    /// Wrap raw descriptor bytes
    pub fn new(bytes: [u8; DESCRIPTOR_BYTES]) -> Self {
        Self(bytes)
    }

    /// Get the raw descriptor bytes
    pub fn as_bytes(&self) -> &[u8; DESCRIPTOR_BYTES] {
        &self.0
    }

    /// Hamming distance: number of differing bits
    pub fn hamming(&self, other: &Self) -> u32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }
}

/// Features derived from one image
///
/// An empty vector (of either kind) means "cannot compare" and scores
/// 0.0 against anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureVector {
    /// Fixed-length colour histogram + channel statistics
    Histogram(Vec<f32>),
    /// Variable-length set of keypoint descriptors
    Keypoints(Vec<Descriptor>),
}

impl FeatureVector {
    /// The empty vector for a strategy
    pub fn empty(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::Histogram => FeatureVector::Histogram(Vec::new()),
            StrategyKind::Keypoint => FeatureVector::Keypoints(Vec::new()),
        }
    }

    /// Number of values (histogram) or descriptors (keypoints)
    pub fn len(&self) -> usize {
        match self {
            FeatureVector::Histogram(values) => values.len(),
            FeatureVector::Keypoints(descriptors) => descriptors.len(),
        }
    }

    /// True when the image could not be described
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The strategy that produced these features
    pub fn kind(&self) -> StrategyKind {
        match self {
            FeatureVector::Histogram(_) => StrategyKind::Histogram,
            FeatureVector::Keypoints(_) => StrategyKind::Keypoint,
        }
    }
}

/// Available extraction strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Global colour histogram compared with cosine similarity
    Histogram,
    /// Local binary descriptors compared with ratio-test matching
    Keypoint,
}

impl StrategyKind {
    /// Get a human-readable description of the strategy
    pub fn description(&self) -> &'static str {
        match self {
            StrategyKind::Histogram => {
                "Colour histogram - compares overall colour distribution, robust to resizing"
            }
            StrategyKind::Keypoint => {
                "Keypoint matching - compares local corner patches, robust to recolouring"
            }
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::Histogram => write!(f, "histogram"),
            StrategyKind::Keypoint => write!(f, "keypoint"),
        }
    }
}

/// Trait for extraction strategy implementations
///
/// A strategy owns both halves of the comparison: how features are
/// extracted and how two feature sets are scored.
pub trait SimilarityStrategy: Send + Sync {
    /// Compute features from an already-decoded image
    fn extract_image(&self, image: &DynamicImage) -> Result<FeatureVector, FeatureError>;

    /// Score two feature sets in [0, 1], higher is more similar.
    ///
    /// Returns 0.0 if either side is empty or was produced by another strategy.
    fn score(&self, a: &FeatureVector, b: &FeatureVector) -> f64;

    /// Get the strategy kind
    fn kind(&self) -> StrategyKind;

    /// Compute features from raw image bytes.
    ///
    /// Never fails: undecodable input yields the empty vector.
    fn extract(&self, bytes: &[u8]) -> FeatureVector {
        let result = FastDecoder::decode(bytes).and_then(|image| self.extract_image(&image));
        match result {
            Ok(features) => features,
            Err(e) => {
                debug!(strategy = %self.kind(), error = %e, "image could not be described");
                FeatureVector::empty(self.kind())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor_with(fill: u8) -> Descriptor {
        Descriptor::new([fill; DESCRIPTOR_BYTES])
    }

    #[test]
    fn hamming_to_self_is_zero() {
        let d = descriptor_with(0xA5);
        assert_eq!(d.hamming(&d), 0);
    }

    #[test]
    fn hamming_counts_all_bits() {
        assert_eq!(descriptor_with(0x00).hamming(&descriptor_with(0xFF)), 256);
    }

    #[test]
    fn hamming_single_bit() {
        let a = descriptor_with(0x00);
        let mut bytes = [0u8; DESCRIPTOR_BYTES];
        bytes[7] = 0b0001_0000;
        assert_eq!(a.hamming(&Descriptor::new(bytes)), 1);
    }

    #[test]
    fn empty_vectors_match_their_kind() {
        let histogram = FeatureVector::empty(StrategyKind::Histogram);
        let keypoints = FeatureVector::empty(StrategyKind::Keypoint);

        assert!(histogram.is_empty());
        assert!(keypoints.is_empty());
        assert_eq!(histogram.kind(), StrategyKind::Histogram);
        assert_eq!(keypoints.kind(), StrategyKind::Keypoint);
    }

    #[test]
    fn strategy_kind_display() {
        assert_eq!(StrategyKind::Histogram.to_string(), "histogram");
        assert_eq!(StrategyKind::Keypoint.to_string(), "keypoint");
    }
}
