//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};

/// All events emitted by the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Candidate ranking events
    Rank(RankEvent),
    /// Search-level events
    Search(SearchEvent),
}

/// Events while ranking candidates against a query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RankEvent {
    /// Ranking has started
    Started { total_candidates: usize },
    /// A candidate has been scored
    Progress(RankProgress),
    /// A candidate was left out (missing bytes, fetch failure)
    CandidateSkipped { id: String, reason: String },
    /// Ranking completed
    Completed { matches: usize },
}

/// Progress information during ranking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankProgress {
    /// Number of candidates scored so far
    pub scored: usize,
    /// Total number of candidates being scored
    pub total: usize,
}

/// Search-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SearchEvent {
    /// Search has started over this many candidate ids
    Started { candidates: usize },
    /// Search completed
    Completed { summary: SearchSummary },
}

/// Summary of a finished search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSummary {
    /// Candidates that were fetched and scored
    pub candidates_considered: usize,
    /// Candidates that could not be fetched
    pub candidates_skipped: usize,
    /// Matches returned after truncation
    pub matches: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}
