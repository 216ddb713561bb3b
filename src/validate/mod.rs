//! Fact-overlap validation.
//!
//! Once a candidate is selected and its facts fetched, the label must still
//! be supported by the evidence: at least σ tokens shared between the query
//! and the fact texts. Pure given its inputs — the network fetch that
//! produced the facts is the provider's concern.


use crate::facts::Facts;
use crate::normalize::NormalizedQuery;

/// Default minimum shared-token count σ.
pub const DEFAULT_MIN_OVERLAP: usize = 1;

/// Outcome of validating fetched facts against the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationResult {
    /// Evidence supports the label.
    Supported {
        /// Shared-token count.
        overlap: usize,
    },
    /// Evidence does not support the label.
    Unsupported {
        /// Shared-token count observed.
        overlap: usize,
    },
}

impl ValidationResult {
    /// Returns `true` if the facts support the label.
    pub fn is_supported(&self) -> bool {
        matches!(self, ValidationResult::Supported { .. })
    }

    /// Returns the shared-token count.
    pub fn overlap(&self) -> usize {
        match self {
            ValidationResult::Supported { overlap } | ValidationResult::Unsupported { overlap } => {
                *overlap
            }
        }
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationResult::Supported { overlap } => write!(f, "SUPPORTED (overlap: {overlap})"),
            ValidationResult::Unsupported { overlap } => {
                write!(f, "UNSUPPORTED (overlap: {overlap})")
            }
        }
    }
}

/// Validates `facts` against `query`, requiring at least `min_overlap`
/// shared tokens.
///
/// Vacuous evidence fails: facts with no texts at all can never support a
/// label, and an empty query has nothing to support.
pub fn validate(facts: &Facts, query: &NormalizedQuery, min_overlap: usize) -> ValidationResult {
    let fact_tokens = facts.tokens();
    if fact_tokens.is_empty() || query.tokens.is_empty() {
        return ValidationResult::Unsupported { overlap: 0 };
    }

    let overlap = fact_tokens.intersection(&query.tokens).count();
    if overlap >= min_overlap {
        ValidationResult::Supported { overlap }
    } else {
        ValidationResult::Unsupported { overlap }
    }
}
