//! Natural-language diagnosis generation.
//!
//! The last pipeline stage, reached only after selection and validation both
//! pass. Consumed through the [`Generator`] trait; the real implementation
//! ([`LlmGenerator`]) builds a fact-grounded prompt and calls an LLM via
//! `genai`. Any failure collapses to a single refusal reason upstream.

pub mod llm;
pub mod prompt;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use llm::{DEFAULT_LLM_MODEL, LlmGenerator};
pub use prompt::{SYSTEM_PROMPT, format_facts};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockGenerator;

use thiserror::Error;

use crate::facts::Facts;

/// Errors raised by a diagnosis generator.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The facts carried no usable text to ground a response on.
    #[error("no usable facts to generate from for {eppocode}")]
    NoFacts { eppocode: String },

    /// The LLM provider failed or returned an empty completion.
    #[error("generation failed: {message}")]
    Provider { message: String },
}

/// Minimal async interface over whatever model produces the diagnosis text.
///
/// Prompt construction and model selection live behind this trait; the core
/// only sees the generated message or a failure.
pub trait Generator: Send + Sync {
    /// Generates a diagnosis message for `label` grounded in `facts`.
    fn generate(
        &self,
        label: &str,
        facts: &Facts,
    ) -> impl std::future::Future<Output = Result<String, GenerateError>> + Send;
}
