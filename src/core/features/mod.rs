//! # Features Module
//!
//! Turns image bytes into comparable features.
//!
//! ## Supported Strategies
//! - **Histogram** - Per-channel colour histograms plus mean/std, compared
//!   with cosine similarity. Fixed-length, symmetric.
//! - **Keypoint** - FAST corners with rotated BRIEF descriptors, compared
//!   with 2-nearest-neighbour ratio-test matching. Variable-length, asymmetric.
//!
//! A strategy is picked once, at configuration time. Features from different
//! strategies are never compared; doing so scores 0.0.
//!
//! ## Performance Optimizations
//! - Uses `zune-jpeg` for 1.5-2x faster JPEG decoding
//! - Uses `fast_image_resize` for SIMD-accelerated resizing
//!
//! ## Example
//! ```rust,ignore
//! use visual_match::core::features::{StrategyConfig, StrategyKind};
//!
//! let strategy = StrategyConfig::new()
//!     .kind(StrategyKind::Histogram)
//!     .build()?;
//!
//! let a = strategy.extract(&query_bytes);
//! let b = strategy.extract(&candidate_bytes);
//! let score = strategy.score(&a, &b);
//! ```

mod algorithms;
pub mod fast_decode;
pub mod fast_resize;
mod traits;

pub use algorithms::{
    cosine_score, ratio_test_score, FastDetector, HistogramStrategy, Keypoint, KeypointStrategy,
};
pub use traits::{Descriptor, FeatureVector, SimilarityStrategy, StrategyKind, DESCRIPTOR_BYTES};

use crate::error::SimilarityError;

/// Smallest image side the keypoint strategy may shrink to
const MIN_KEYPOINT_DIMENSION: u32 = 64;

/// Configuration builder for extraction strategies
#[derive(Debug, Clone)]
pub struct StrategyConfig {
    /// Strategy to use
    kind: StrategyKind,
    /// Histogram: side of the canonical square
    canonical_size: u32,
    /// Histogram: bins per channel
    bins: usize,
    /// Keypoint: maximum keypoints per image
    max_keypoints: usize,
    /// Keypoint: ratio-test factor
    ratio: f32,
    /// Keypoint: longest side before detection
    max_dimension: u32,
    /// Keypoint: FAST intensity threshold
    fast_threshold: u8,
}

impl StrategyConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            kind: StrategyKind::Histogram,
            canonical_size: 64,
            bins: 64,
            max_keypoints: 500,
            ratio: 0.7,
            max_dimension: 640,
            fast_threshold: 20,
        }
    }

    /// Set the strategy
    pub fn kind(mut self, kind: StrategyKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the canonical resize target for histograms
    pub fn canonical_size(mut self, size: u32) -> Self {
        self.canonical_size = size;
        self
    }

    /// Set the histogram bins per channel (1-256)
    pub fn bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    /// Set the maximum number of keypoints kept per image
    pub fn max_keypoints(mut self, max: usize) -> Self {
        self.max_keypoints = max;
        self
    }

    /// Set the ratio-test factor
    ///
    /// Lower values accept fewer, less ambiguous matches.
    pub fn ratio(mut self, ratio: f32) -> Self {
        self.ratio = ratio;
        self
    }

    /// Set the longest image side used for keypoint detection
    pub fn max_dimension(mut self, max: u32) -> Self {
        self.max_dimension = max;
        self
    }

    /// Set the FAST corner threshold
    pub fn fast_threshold(mut self, threshold: u8) -> Self {
        self.fast_threshold = threshold;
        self
    }

    /// Build the strategy
    pub fn build(self) -> Result<Box<dyn SimilarityStrategy>, SimilarityError> {
        match self.kind {
            StrategyKind::Histogram => {
                if self.canonical_size == 0 {
                    return Err(SimilarityError::Config(
                        "canonical size must be at least 1".to_string(),
                    ));
                }
                if !(1..=256).contains(&self.bins) {
                    return Err(SimilarityError::Config(format!(
                        "histogram bins must be 1-256, got {}",
                        self.bins
                    )));
                }
                Ok(Box::new(HistogramStrategy::new(self.canonical_size, self.bins)))
            }
            StrategyKind::Keypoint => {
                if self.max_keypoints == 0 {
                    return Err(SimilarityError::Config(
                        "max keypoints must be at least 1".to_string(),
                    ));
                }
                if !(self.ratio > 0.0 && self.ratio <= 1.0) {
                    return Err(SimilarityError::Config(format!(
                        "ratio must be in (0, 1], got {}",
                        self.ratio
                    )));
                }
                if self.max_dimension < MIN_KEYPOINT_DIMENSION {
                    return Err(SimilarityError::Config(format!(
                        "max dimension must be at least {}, got {}",
                        MIN_KEYPOINT_DIMENSION, self.max_dimension
                    )));
                }
                Ok(Box::new(KeypointStrategy::new(
                    self.max_keypoints,
                    self.ratio,
                    self.max_dimension,
                    self.fast_threshold,
                )))
            }
        }
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self::new()
    }
}
