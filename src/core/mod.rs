//! # Core Module
//!
//! The front-end-agnostic similarity engine.
//!
//! ## Modules
//! - `features` - Decodes images and extracts comparable features
//! - `ranking` - Scores candidates against a query and orders them
//! - `store` - Read access to image bytes in a blob store
//! - `search` - Store-backed "search by photo" with top-K truncation

pub mod features;
pub mod ranking;
pub mod search;
pub mod store;

// Re-export commonly used types
pub use features::{FeatureVector, SimilarityStrategy, StrategyConfig, StrategyKind};
pub use ranking::{Candidate, MatchStrength, Query, SimilarityEngine, SimilarityResult};
pub use search::{SearchReport, VisualSearch};
pub use store::{BlobStore, DirectoryStore, ImageId, InMemoryStore};
