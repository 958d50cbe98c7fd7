//! # Error Module
//!
//! Error types for the visual match engine.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Degrade, don't abort** - a bad image is a non-match, not a failed search
//! - **Include context** - ids, paths, what went wrong

use std::path::PathBuf;
use thiserror::Error;

/// Top-level library error
#[derive(Error, Debug)]
pub enum SimilarityError {
    #[error("Feature extraction error: {0}")]
    Feature(#[from] FeatureError),

    #[error("Blob store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid threshold: {value} (must be at least 0.0 and below 1.0)")]
    InvalidThreshold { value: f64 },

    #[error("Invalid result limit: must be at least 1")]
    InvalidLimit,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to serialize results: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors that occur while turning image bytes into features
///
/// These never reach callers of `extract`; they are logged and the
/// image is treated as "cannot compare".
#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("Image buffer is empty")]
    EmptyInput,

    #[error("Unsupported image format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Failed to decode image: {reason}")]
    DecodeError { reason: String },

    #[error("Failed to resize image: {reason}")]
    ResizeError { reason: String },
}

/// Errors raised by blob store backends
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Blob store root not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Failed to read blob {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Blob store lock poisoned")]
    LockPoisoned,
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, SimilarityError>;
