//! # Visual Match
//!
//! Finds reported lost-and-found items that look like a photo.
//!
//! ## Core Philosophy
//! - **Best effort** - A broken or missing image is a non-match, never a failed search
//! - **Deterministic** - Same inputs, same ranking, ties in input order
//! - **Pluggable** - Histogram or keypoint features, chosen at configuration time
//!
//! ## Architecture
//! The library is split into a core engine and presentation layers:
//! - `core` - Feature extraction, ranking, blob access and search
//! - `events` - Event-driven progress reporting
//! - `error` - Error types
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{Result, SimilarityError};

/// Initialize tracing for the library
///
/// This should be called by the application entry point. Filtering is
/// controlled with `RUST_LOG`.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    // A subscriber may already be installed (e.g. by an embedding application)
    let _ = tracing::subscriber::set_global_default(subscriber);
}
