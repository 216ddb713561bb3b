//! Label normalization.
//!
//! Turns a raw CV-model disease label into a [`NormalizedQuery`]: a
//! deduplicated token set partitioned into host, symptom, and location terms.
//! Normalization is pure and infallible — an empty or garbage label yields an
//! empty query, never an error. Downstream stages treat an empty query as a
//! natural "no candidates" outcome.

pub mod vocab;


use std::collections::BTreeSet;

pub use vocab::{GENERIC_TERMS, HOST_GENERA, LOCATION_TERMS};

/// Minimum token length kept by the tokenizer.
pub const MIN_TOKEN_LEN: usize = 2;

/// A normalized disease label with its extracted term partitions.
///
/// Invariant: `host_terms`, `symptom_terms`, and `location_terms` are all
/// subsets of `tokens`. The partitions are not required to be disjoint, but
/// they are deterministic for a given input label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    /// The raw label as received (trimmed), kept for prompts and reporting.
    pub original: String,
    /// Deduplicated, lowercased, stop-word-filtered tokens.
    pub tokens: BTreeSet<String>,
    /// Leading token(s) recognized as a known host genus. Empty when the
    /// label does not start with a recognized host — not an error, the
    /// scorer simply awards no host bonus.
    pub host_terms: Vec<String>,
    /// Tokens claimed by neither the host nor the location partition.
    pub symptom_terms: BTreeSet<String>,
    /// Tokens naming a plant part (`leaf`, `stem`, `root`, ...).
    pub location_terms: BTreeSet<String>,
}

impl NormalizedQuery {
    /// Returns `true` if normalization produced no usable tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Splits `text` into lowercase tokens of at least [`MIN_TOKEN_LEN`]
/// characters, preserving order and duplicates.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}

/// Tokenizes `text` into a deduplicated set. Used for candidate fullnames and
/// fact texts so that both sides of every overlap computation share one
/// tokenization rule.
pub fn token_set(text: &str) -> BTreeSet<String> {
    tokenize(text).into_iter().collect()
}

/// Normalizes a CV-model disease label into a [`NormalizedQuery`].
pub fn normalize(label: &str) -> NormalizedQuery {
    let original = label.trim().to_string();
    let raw_tokens = tokenize(&original);

    // Location terms are extracted before stop-word filtering.
    let location_terms: BTreeSet<String> = raw_tokens
        .iter()
        .filter(|t| vocab::is_location_term(t))
        .cloned()
        .collect();

    let mut meaningful: Vec<String> = raw_tokens
        .iter()
        .filter(|t| !vocab::is_generic_term(t))
        .cloned()
        .collect();

    // A label made entirely of stop-words still deserves a lookup attempt.
    if meaningful.is_empty() {
        meaningful = raw_tokens;
    }

    let tokens: BTreeSet<String> = meaningful.iter().cloned().collect();

    let host_terms: Vec<String> = match meaningful.first() {
        Some(first) if vocab::is_host_genus(first) => vec![first.clone()],
        _ => Vec::new(),
    };

    let symptom_terms: BTreeSet<String> = tokens
        .iter()
        .filter(|t| !host_terms.iter().any(|h| h == *t) && !location_terms.contains(*t))
        .cloned()
        .collect();

    // Keeps the subset invariant even if a location token was length-filtered.
    let location_terms: BTreeSet<String> = location_terms
        .into_iter()
        .filter(|t| tokens.contains(t))
        .collect();

    NormalizedQuery {
        original,
        tokens,
        host_terms,
        symptom_terms,
        location_terms,
    }
}
