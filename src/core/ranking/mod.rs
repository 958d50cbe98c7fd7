//! # Ranking Module
//!
//! Ranks candidate images by similarity to a query.
//!
//! ## How It Works
//! 1. Extract the query's features once
//! 2. Extract and score every candidate in parallel (rayon)
//! 3. Keep candidates scoring strictly above the threshold
//! 4. Stable-sort by descending score, so ties keep input order
//!
//! Nothing in here fails: undecodable images score 0.0 and candidates
//! without bytes are skipped.

mod types;

pub use types::{Candidate, MatchStrength, Query, SimilarityResult};

use crate::core::features::{FeatureVector, SimilarityStrategy, StrategyConfig, StrategyKind};
use crate::error::SimilarityError;
use crate::events::{null_sender, EventSender, RankEvent, RankProgress};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Scores and ranks images with one extraction strategy
pub struct SimilarityEngine {
    strategy: Box<dyn SimilarityStrategy>,
}

impl SimilarityEngine {
    /// Create an engine around an already-built strategy
    pub fn new(strategy: Box<dyn SimilarityStrategy>) -> Self {
        Self { strategy }
    }

    /// Create an engine with the default configuration of a strategy
    pub fn with_kind(kind: StrategyKind) -> Result<Self, SimilarityError> {
        Ok(Self::new(StrategyConfig::new().kind(kind).build()?))
    }

    /// The strategy in use
    pub fn kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// Features of one image; empty if it cannot be decoded
    pub fn extract(&self, bytes: &[u8]) -> FeatureVector {
        self.strategy.extract(bytes)
    }

    /// Score two feature sets
    pub fn score(&self, a: &FeatureVector, b: &FeatureVector) -> f64 {
        self.strategy.score(a, b)
    }

    /// Score two raw images
    pub fn compare(&self, a: &[u8], b: &[u8]) -> f64 {
        self.score(&self.extract(a), &self.extract(b))
    }

    /// Rank candidates against the query without progress events
    pub fn rank(&self, query: Query<'_>, candidates: &[Candidate], threshold: f64) -> Vec<SimilarityResult> {
        self.rank_with_events(query, candidates, threshold, &null_sender())
    }

    /// Rank candidates against the query, reporting progress
    pub fn rank_with_events(
        &self,
        query: Query<'_>,
        candidates: &[Candidate],
        threshold: f64,
        events: &EventSender,
    ) -> Vec<SimilarityResult> {
        let total = candidates.len();
        events.rank(RankEvent::Started {
            total_candidates: total,
        });

        let query_features = self.extract(query.bytes);
        if query_features.is_empty() {
            debug!(strategy = %self.kind(), "query image has no features; nothing can match");
        }

        let scored = AtomicUsize::new(0);
        let scores: Vec<Option<f64>> = candidates
            .par_iter()
            .map(|candidate| {
                if query.id == Some(&candidate.id) {
                    return None;
                }

                let Some(bytes) = candidate.bytes.as_deref() else {
                    debug!(id = %candidate.id, "candidate image missing, skipping");
                    events.skipped(&candidate.id, "image missing");
                    return None;
                };

                let features = self.extract(bytes);
                let score = self.score(&query_features, &features);

                let done = scored.fetch_add(1, Ordering::Relaxed) + 1;
                events.rank(RankEvent::Progress(RankProgress {
                    scored: done,
                    total,
                }));

                Some(score)
            })
            .collect();

        let mut results: Vec<SimilarityResult> = candidates
            .iter()
            .zip(scores)
            .filter_map(|(candidate, score)| {
                score
                    .filter(|score| *score > threshold)
                    .map(|score| SimilarityResult {
                        id: candidate.id.clone(),
                        score,
                    })
            })
            .collect();

        // Stable: equal scores keep candidate order
        results.sort_by(|a, b| b.score.total_cmp(&a.score));

        events.rank(RankEvent::Completed {
            matches: results.len(),
        });

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::ImageId;
    use crate::error::FeatureError;
    use crate::events::{Event, EventChannel};
    use image::DynamicImage;

    /// Strategy whose "image" is the first byte of the buffer; score is
    /// 1 - |a - b| / 255. Lets ranking be tested without real images.
    struct ByteStrategy;

    impl SimilarityStrategy for ByteStrategy {
        fn extract_image(&self, _image: &DynamicImage) -> Result<FeatureVector, FeatureError> {
            unreachable!("ByteStrategy overrides extract")
        }

        fn extract(&self, bytes: &[u8]) -> FeatureVector {
            FeatureVector::Histogram(bytes.first().map(|&b| vec![b as f32]).unwrap_or_default())
        }

        fn score(&self, a: &FeatureVector, b: &FeatureVector) -> f64 {
            match (a, b) {
                (FeatureVector::Histogram(a), FeatureVector::Histogram(b))
                    if !a.is_empty() && !b.is_empty() =>
                {
                    1.0 - ((a[0] - b[0]).abs() as f64 / 255.0)
                }
                _ => 0.0,
            }
        }

        fn kind(&self) -> StrategyKind {
            StrategyKind::Histogram
        }
    }

    fn engine() -> SimilarityEngine {
        SimilarityEngine::new(Box::new(ByteStrategy))
    }

    fn ids(results: &[SimilarityResult]) -> Vec<&str> {
        results.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn empty_candidates_rank_empty() {
        assert!(engine().rank(Query::new(&[100]), &[], 0.0).is_empty());
    }

    #[test]
    fn results_are_sorted_descending() {
        let candidates = vec![
            Candidate::new("far", vec![0]),
            Candidate::new("close", vec![95]),
            Candidate::new("middle", vec![50]),
        ];

        let results = engine().rank(Query::new(&[100]), &candidates, 0.0);

        assert_eq!(ids(&results), vec!["close", "middle", "far"]);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn ties_keep_input_order() {
        let candidates = vec![
            Candidate::new("first", vec![90]),
            Candidate::new("best", vec![100]),
            Candidate::new("second", vec![110]),
            Candidate::new("third", vec![90]),
        ];

        let results = engine().rank(Query::new(&[100]), &candidates, 0.0);

        assert_eq!(ids(&results), vec!["best", "first", "second", "third"]);
    }

    #[test]
    fn query_id_is_excluded() {
        let query_id = ImageId::new("me");
        let candidates = vec![
            Candidate::new("me", vec![100]),
            Candidate::new("other", vec![100]),
        ];

        let results = engine().rank(Query::with_id(&query_id, &[100]), &candidates, 0.0);

        assert_eq!(ids(&results), vec!["other"]);
    }

    #[test]
    fn missing_images_are_skipped() {
        let candidates = vec![Candidate::missing("gone"), Candidate::new("here", vec![100])];

        let results = engine().rank(Query::new(&[100]), &candidates, 0.0);

        assert_eq!(ids(&results), vec!["here"]);
    }

    #[test]
    fn threshold_is_exclusive() {
        // 100 vs 49 scores exactly 0.8
        let candidates = vec![Candidate::new("edge", vec![49]), Candidate::new("above", vec![100])];

        let results = engine().rank(Query::new(&[100]), &candidates, 0.8);

        assert_eq!(ids(&results), vec!["above"]);
    }

    #[test]
    fn unreadable_query_matches_nothing() {
        let candidates = vec![Candidate::new("a", vec![1]), Candidate::new("b", vec![2])];
        assert!(engine().rank(Query::new(&[]), &candidates, 0.0).is_empty());
    }

    #[test]
    fn rank_emits_progress_events() {
        let (sender, receiver) = EventChannel::new();
        let candidates = vec![
            Candidate::new("a", vec![10]),
            Candidate::missing("b"),
            Candidate::new("c", vec![30]),
        ];

        let results = engine().rank_with_events(Query::new(&[10]), &candidates, 0.0, &sender);
        drop(sender);

        let events: Vec<_> = receiver.iter().collect();
        assert!(matches!(
            events.first(),
            Some(Event::Rank(RankEvent::Started { total_candidates: 3 }))
        ));
        assert!(matches!(
            events.last(),
            Some(Event::Rank(RankEvent::Completed { matches })) if *matches == results.len()
        ));

        let progress = events
            .iter()
            .filter(|e| matches!(e, Event::Rank(RankEvent::Progress(_))))
            .count();
        let skipped: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                Event::Rank(RankEvent::CandidateSkipped { id, .. }) => Some(id.as_str()),
                _ => None,
            })
            .collect();

        assert_eq!(progress, 2);
        assert_eq!(skipped, vec!["b"]);
    }

    #[test]
    fn engine_with_kind_uses_that_strategy() {
        let engine = SimilarityEngine::with_kind(StrategyKind::Keypoint).unwrap();
        assert_eq!(engine.kind(), StrategyKind::Keypoint);
    }
}
