use std::collections::BTreeSet;

use crate::normalize::{NormalizedQuery, tokenize};

use super::types::{RawCandidate, ScoreWeights, ScoredCandidate};

/// Scores one raw candidate against a normalized query.
///
/// Composite of four factors:
/// - token overlap ratio between the candidate fullname and the query,
/// - a host bonus when the fullname's leading token is a query host term,
/// - a location bonus proportional to plant-part term overlap,
/// - a datatype bonus preferring pest/disease record types.
///
/// The result is capped at `weights.score_cap`. Pure: no I/O, deterministic
/// for a given candidate/query/weights triple.
pub fn score_candidate(
    candidate: &RawCandidate,
    query: &NormalizedQuery,
    weights: &ScoreWeights,
) -> ScoredCandidate {
    let name_words = tokenize(&candidate.fullname);
    let name_tokens: BTreeSet<String> = name_words.iter().cloned().collect();

    let token_overlap = name_tokens.intersection(&query.tokens).count();
    let overlap_ratio = token_overlap as f32 / query.tokens.len().max(1) as f32;

    let host_match = match name_words.first() {
        Some(first) => query.host_terms.iter().any(|h| h == first),
        None => false,
    };
    let host_bonus = if host_match { weights.host_bonus } else { 0.0 };

    let location_bonus = if query.location_terms.is_empty() {
        0.0
    } else {
        let location_overlap = name_tokens.intersection(&query.location_terms).count();
        weights.location_multiplier * (location_overlap as f32 / query.location_terms.len() as f32)
    };

    let datatype_bonus = weights.datatype_bonus(candidate.datatype);

    let score =
        (overlap_ratio + host_bonus + location_bonus + datatype_bonus).min(weights.score_cap);

    ScoredCandidate {
        eppocode: candidate.eppocode.clone(),
        datatype: candidate.datatype,
        fullname: candidate.fullname.clone(),
        score,
        token_overlap,
        host_match,
    }
}
