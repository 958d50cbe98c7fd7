//! # Search Module
//!
//! "Search by photo": rank everything in a blob store against an
//! uploaded image and keep the best few.
//!
//! ## Search Stages
//! 1. **Fetch** - Load candidate bytes from the store; unreadable or
//!    missing blobs are skipped, never fatal
//! 2. **Rank** - Score candidates with the configured strategy
//! 3. **Truncate** - Keep the top `limit` matches
//!
//! Joining ids back to item records is left to the caller.

use crate::core::features::{StrategyConfig, StrategyKind};
use crate::core::ranking::{Candidate, Query, SimilarityEngine, SimilarityResult};
use crate::core::store::{BlobStore, ImageId};
use crate::error::SimilarityError;
use crate::events::{null_sender, EventSender, SearchEvent, SearchSummary};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

/// Default minimum score for a match
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Default number of matches returned
pub const DEFAULT_LIMIT: usize = 10;

/// Result of one search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    /// Best matches, highest score first
    pub matches: Vec<SimilarityResult>,
    /// Candidates whose bytes were fetched and scored
    pub candidates_considered: usize,
    /// Candidates that were missing or failed to load
    pub skipped: Vec<ImageId>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Builder for visual search configuration
pub struct VisualSearchBuilder {
    strategy: StrategyConfig,
    threshold: f64,
    limit: usize,
}

impl VisualSearchBuilder {
    /// Create a new builder with defaults
    pub fn new() -> Self {
        Self {
            strategy: StrategyConfig::new(),
            threshold: DEFAULT_THRESHOLD,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Set the extraction strategy
    pub fn strategy(mut self, kind: StrategyKind) -> Self {
        self.strategy = self.strategy.kind(kind);
        self
    }

    /// Replace the whole strategy configuration
    pub fn strategy_config(mut self, config: StrategyConfig) -> Self {
        self.strategy = config;
        self
    }

    /// Set the minimum score (exclusive) for a match
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the maximum number of matches returned
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Build the search
    pub fn build(self) -> Result<VisualSearch, SimilarityError> {
        if !(0.0..1.0).contains(&self.threshold) {
            return Err(SimilarityError::InvalidThreshold {
                value: self.threshold,
            });
        }
        if self.limit == 0 {
            return Err(SimilarityError::InvalidLimit);
        }

        Ok(VisualSearch {
            engine: SimilarityEngine::new(self.strategy.build()?),
            threshold: self.threshold,
            limit: self.limit,
        })
    }
}

impl Default for VisualSearchBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Search a blob store for images similar to a query
pub struct VisualSearch {
    engine: SimilarityEngine,
    threshold: f64,
    limit: usize,
}

impl VisualSearch {
    /// Create a new search builder
    pub fn builder() -> VisualSearchBuilder {
        VisualSearchBuilder::new()
    }

    /// The underlying engine
    pub fn engine(&self) -> &SimilarityEngine {
        &self.engine
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Search the given candidate ids without events
    pub fn search(
        &self,
        store: &dyn BlobStore,
        query: Query<'_>,
        candidate_ids: &[ImageId],
    ) -> SearchReport {
        self.search_with_events(store, query, candidate_ids, &null_sender())
    }

    /// Search every id the store lists
    pub fn search_all(
        &self,
        store: &dyn BlobStore,
        query: Query<'_>,
    ) -> Result<SearchReport, SimilarityError> {
        let ids = store.ids()?;
        Ok(self.search(store, query, &ids))
    }

    /// Search the given candidate ids with event reporting
    pub fn search_with_events(
        &self,
        store: &dyn BlobStore,
        query: Query<'_>,
        candidate_ids: &[ImageId],
        events: &EventSender,
    ) -> SearchReport {
        let start_time = Instant::now();
        events.search(SearchEvent::Started {
            candidates: candidate_ids.len(),
        });

        let mut candidates = Vec::with_capacity(candidate_ids.len());
        let mut skipped = Vec::new();

        for id in candidate_ids {
            if query.id == Some(id) {
                continue;
            }

            match store.fetch(id) {
                Ok(Some(bytes)) => candidates.push(Candidate::new(id.clone(), bytes)),
                Ok(None) => {
                    skipped.push(id.clone());
                    candidates.push(Candidate::missing(id.clone()));
                }
                Err(e) => {
                    warn!(id = %id, error = %e, "failed to load candidate image");
                    events.skipped(id, e.to_string());
                    skipped.push(id.clone());
                }
            }
        }

        let candidates_considered = candidates.iter().filter(|c| c.bytes.is_some()).count();

        let mut matches = self
            .engine
            .rank_with_events(query, &candidates, self.threshold, events);
        matches.truncate(self.limit);

        let duration_ms = start_time.elapsed().as_millis() as u64;
        info!(
            strategy = %self.engine.kind(),
            considered = candidates_considered,
            skipped = skipped.len(),
            matches = matches.len(),
            duration_ms,
            "visual search finished"
        );

        events.search(SearchEvent::Completed {
            summary: SearchSummary {
                candidates_considered,
                candidates_skipped: skipped.len(),
                matches: matches.len(),
                duration_ms,
            },
        });

        SearchReport {
            matches,
            candidates_considered,
            skipped,
            duration_ms,
        }
    }
}
