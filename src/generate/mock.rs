use std::sync::atomic::{AtomicUsize, Ordering};

use super::{GenerateError, Generator};
use crate::facts::Facts;

/// Generator for tests: canned reply or canned failure, plus a call counter
/// for early-exit assertions.
#[derive(Debug, Default)]
pub struct MockGenerator {
    reply: Option<String>,
    generate_calls: AtomicUsize,
}

impl MockGenerator {
    /// Creates a generator returning `reply` for every request.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            generate_calls: AtomicUsize::new(0),
        }
    }

    /// Creates a generator whose requests always fail.
    pub fn failing() -> Self {
        Self {
            reply: None,
            generate_calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `generate` was invoked.
    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }
}

impl Generator for MockGenerator {
    async fn generate(&self, _label: &str, _facts: &Facts) -> Result<String, GenerateError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);

        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(GenerateError::Provider {
                message: "mock generator failure".to_string(),
            }),
        }
    }
}
