//! Candidate retrieval and threshold selection.
//!
//! The retriever pulls raw name rows from a [`CandidateStore`], scores each
//! with the composite [`scorer`](crate::scoring), deduplicates per
//! `(eppocode, datatype)` pair, and returns the top-k ranked list. The
//! selector then gates the ranked list against the confidence threshold —
//! refusing here must cost zero downstream network calls.

pub mod sqlite;
pub mod store;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use sqlite::SqliteCandidateStore;
pub use store::{CandidateStore, StoreError};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockCandidateStore;

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use crate::normalize::NormalizedQuery;
use crate::scoring::{Datatype, ScoreWeights, ScoredCandidate, score_candidate};

/// Default number of ranked candidates kept after truncation.
pub const DEFAULT_MAX_CANDIDATES: usize = 50;

/// Default confidence threshold θ applied by [`select`].
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.3;

/// Outcome of threshold selection over a ranked candidate list.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// The top candidate met the threshold.
    Selected(ScoredCandidate),
    /// The top candidate's score fell below the threshold.
    LowConfidence {
        /// Best score observed.
        best_score: f32,
    },
    /// The ranked list was empty.
    NoCandidates,
}

impl Selection {
    /// Returns `true` if a candidate was selected.
    pub fn is_selected(&self) -> bool {
        matches!(self, Selection::Selected(_))
    }

    /// Returns the best observed score, if any candidate existed.
    pub fn best_score(&self) -> Option<f32> {
        match self {
            Selection::Selected(candidate) => Some(candidate.score),
            Selection::LowConfidence { best_score } => Some(*best_score),
            Selection::NoCandidates => None,
        }
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selection::Selected(candidate) => {
                write!(f, "SELECTED {} (score: {:.4})", candidate.eppocode, candidate.score)
            }
            Selection::LowConfidence { best_score } => {
                write!(f, "LOW_CONFIDENCE (best: {best_score:.4})")
            }
            Selection::NoCandidates => write!(f, "NO_CANDIDATES"),
        }
    }
}

/// Retrieves, scores, deduplicates, and ranks candidates for `query`.
///
/// Dedup keeps, per `(eppocode, datatype)` pair, the highest-scoring name
/// variant (longer name wins an exact score tie, so the result does not
/// depend on store ordering). Sorting is score-descending with ascending
/// eppocode as the deterministic tie-break. An empty store result yields an
/// empty Vec, not an error.
pub async fn retrieve<S: CandidateStore>(
    query: &NormalizedQuery,
    store: &S,
    weights: &ScoreWeights,
    max_candidates: usize,
) -> Result<Vec<ScoredCandidate>, StoreError> {
    let rows = store.lookup(&query.tokens).await?;
    debug!(rows = rows.len(), tokens = query.tokens.len(), "scoring raw candidates");

    let mut best: HashMap<(String, Datatype), ScoredCandidate> = HashMap::new();
    for row in &rows {
        let scored = score_candidate(row, query, weights);
        let key = (scored.eppocode.clone(), scored.datatype);
        match best.get(&key) {
            Some(existing)
                if existing.score > scored.score
                    || (existing.score == scored.score
                        && existing.fullname.len() >= scored.fullname.len()) => {}
            _ => {
                best.insert(key, scored);
            }
        }
    }

    let mut ranked: Vec<ScoredCandidate> = best.into_values().collect();
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.eppocode.cmp(&b.eppocode))
    });
    ranked.truncate(max_candidates);

    Ok(ranked)
}

/// Applies the confidence threshold θ to a ranked candidate list.
pub fn select(ranked: &[ScoredCandidate], threshold: f32) -> Selection {
    match ranked.first() {
        None => Selection::NoCandidates,
        Some(top) if top.score < threshold => Selection::LowConfidence {
            best_score: top.score,
        },
        Some(top) => Selection::Selected(top.clone()),
    }
}
