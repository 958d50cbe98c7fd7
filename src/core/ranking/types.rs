//! Inputs and outputs of candidate ranking.

use crate::core::store::ImageId;
use serde::{Deserialize, Serialize};

/// The image being searched for
#[derive(Debug, Clone, Copy)]
pub struct Query<'a> {
    /// Identifier of the query, if it is itself stored; never returned as a match
    pub id: Option<&'a ImageId>,
    /// Raw image bytes
    pub bytes: &'a [u8],
}

impl<'a> Query<'a> {
    /// A query that is not part of the candidate collection
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { id: None, bytes }
    }

    /// A query that may also appear among the candidates
    pub fn with_id(id: &'a ImageId, bytes: &'a [u8]) -> Self {
        Self { id: Some(id), bytes }
    }
}

/// One image considered for ranking
#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: ImageId,
    /// `None` when the backing bytes are unavailable
    pub bytes: Option<Vec<u8>>,
}

impl Candidate {
    pub fn new(id: impl Into<ImageId>, bytes: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            bytes: Some(bytes),
        }
    }

    /// A candidate whose image could not be found
    pub fn missing(id: impl Into<ImageId>) -> Self {
        Self {
            id: id.into(),
            bytes: None,
        }
    }
}

/// A ranked candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub id: ImageId,
    /// Similarity in [0, 1], higher is more similar
    pub score: f64,
}

impl SimilarityResult {
    /// Classify the score for display
    pub fn strength(&self) -> MatchStrength {
        MatchStrength::from_score(self.score)
    }
}

/// Coarse classification of a similarity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStrength {
    /// Score >= 0.999, the same picture
    Identical,
    /// Score >= 0.9
    Strong,
    /// Score >= 0.75
    Moderate,
    /// Anything lower
    Weak,
}

impl MatchStrength {
    /// Classify based on score
    pub fn from_score(score: f64) -> Self {
        if score >= 0.999 {
            MatchStrength::Identical
        } else if score >= 0.9 {
            MatchStrength::Strong
        } else if score >= 0.75 {
            MatchStrength::Moderate
        } else {
            MatchStrength::Weak
        }
    }
}

impl std::fmt::Display for MatchStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStrength::Identical => write!(f, "Identical"),
            MatchStrength::Strong => write!(f, "Strong Match"),
            MatchStrength::Moderate => write!(f, "Possible Match"),
            MatchStrength::Weak => write!(f, "Weak Match"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strength_from_score() {
        assert_eq!(MatchStrength::from_score(1.0), MatchStrength::Identical);
        assert_eq!(MatchStrength::from_score(0.95), MatchStrength::Strong);
        assert_eq!(MatchStrength::from_score(0.8), MatchStrength::Moderate);
        assert_eq!(MatchStrength::from_score(0.3), MatchStrength::Weak);
    }

    #[test]
    fn missing_candidate_has_no_bytes() {
        let candidate = Candidate::missing("lost-keys");
        assert!(candidate.bytes.is_none());
        assert_eq!(candidate.id.as_str(), "lost-keys");
    }

    #[test]
    fn result_serializes_id_as_string() {
        let result = SimilarityResult {
            id: ImageId::new("bag.png"),
            score: 0.5,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"id":"bag.png","score":0.5}"#);
    }
}
