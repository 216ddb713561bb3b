//! Composite candidate scoring.
//!
//! Given a [`NormalizedQuery`](crate::normalize::NormalizedQuery) and one raw
//! EPPO name row, compute a similarity score in `[0, score_cap]`. Scoring is
//! a pure function; retrieval applies it to every row the store returns and
//! the selector compares the top score against the confidence threshold.

pub mod scorer;
pub mod types;


pub use scorer::score_candidate;
pub use types::{Datatype, RawCandidate, ScoreWeights, ScoredCandidate};
