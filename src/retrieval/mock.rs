use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::store::{CandidateStore, StoreError};
use crate::scoring::RawCandidate;

/// In-memory candidate store for tests: canned rows plus a lookup counter
/// for early-exit assertions.
#[derive(Debug, Default)]
pub struct MockCandidateStore {
    rows: Vec<RawCandidate>,
    fail: bool,
    lookup_calls: AtomicUsize,
}

impl MockCandidateStore {
    /// Creates a store returning `rows` for every non-empty lookup.
    pub fn new(rows: Vec<RawCandidate>) -> Self {
        Self {
            rows,
            fail: false,
            lookup_calls: AtomicUsize::new(0),
        }
    }

    /// Creates an empty store.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Creates a store whose lookups fail with a hard [`StoreError`].
    pub fn failing() -> Self {
        Self {
            rows: Vec::new(),
            fail: true,
            lookup_calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `lookup` was invoked.
    pub fn lookup_calls(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }
}

impl CandidateStore for MockCandidateStore {
    async fn lookup(&self, tokens: &BTreeSet<String>) -> Result<Vec<RawCandidate>, StoreError> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(StoreError::QueryFailed {
                message: "mock store failure".to_string(),
            });
        }
        if tokens.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.rows.clone())
    }
}
