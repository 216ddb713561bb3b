use std::sync::atomic::{AtomicUsize, Ordering};

use super::{FactError, FactProvider, Facts};

/// Fact provider for tests: canned facts or a canned failure, plus a fetch
/// counter for early-exit assertions.
#[derive(Debug, Default)]
pub struct MockFactProvider {
    facts: Option<Facts>,
    fetch_calls: AtomicUsize,
}

impl MockFactProvider {
    /// Creates a provider returning `facts` for every code.
    pub fn new(facts: Facts) -> Self {
        Self {
            facts: Some(facts),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    /// Creates a provider whose fetches always fail.
    pub fn failing() -> Self {
        Self {
            facts: None,
            fetch_calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `fetch_facts` was invoked.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

impl FactProvider for MockFactProvider {
    async fn fetch_facts(&self, eppocode: &str) -> Result<Facts, FactError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        match &self.facts {
            Some(facts) => Ok(Facts {
                eppocode: eppocode.to_string(),
                ..facts.clone()
            }),
            None => Err(FactError::RequestFailed {
                eppocode: eppocode.to_string(),
                message: "mock provider failure".to_string(),
            }),
        }
    }
}
