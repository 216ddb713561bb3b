use std::sync::atomic::{AtomicU64, Ordering};

use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};
use tracing::debug;

use super::prompt::{SYSTEM_PROMPT, build_user_prompt, format_facts};
use super::{GenerateError, Generator};
use crate::facts::Facts;

/// Default model identifier (Groq-hosted, resolved by `genai` through its
/// provider environment variables).
pub const DEFAULT_LLM_MODEL: &str = "openai/gpt-oss-120b";

/// Diagnosis generator backed by a `genai` chat model.
pub struct LlmGenerator {
    client: Client,
    model: String,
    call_count: AtomicU64,
}

impl std::fmt::Debug for LlmGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmGenerator")
            .field("model", &self.model)
            .finish()
    }
}

impl LlmGenerator {
    /// Creates a generator for `model` with the default `genai` client
    /// (provider credentials come from the environment).
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
            call_count: AtomicU64::new(0),
        }
    }

    /// Returns the configured model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Number of completed LLM calls issued.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl Generator for LlmGenerator {
    async fn generate(&self, label: &str, facts: &Facts) -> Result<String, GenerateError> {
        let formatted = format_facts(facts);
        if formatted.trim().is_empty() {
            return Err(GenerateError::NoFacts {
                eppocode: facts.eppocode.clone(),
            });
        }

        let request = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_user_prompt(label, &formatted)),
        ]);

        self.call_count.fetch_add(1, Ordering::Relaxed);
        debug!(model = %self.model, eppocode = %facts.eppocode, "issuing LLM generation request");

        let response = self
            .client
            .exec_chat(&self.model, request, None)
            .await
            .map_err(|e| GenerateError::Provider {
                message: e.to_string(),
            })?;

        let text = response.first_text().unwrap_or_default().trim().to_string();
        if text.is_empty() {
            return Err(GenerateError::Provider {
                message: "empty completion".to_string(),
            });
        }
        Ok(text)
    }
}
