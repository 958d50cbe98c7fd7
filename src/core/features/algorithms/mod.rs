//! Extraction strategy implementations.

mod histogram;
mod keypoint;

pub use histogram::{cosine_score, HistogramStrategy};
pub use keypoint::{ratio_test_score, FastDetector, Keypoint, KeypointStrategy};
