//! Verdant library crate (used by the CLI binary and integration tests).
//!
//! Maps a free-text disease/pest label (typically a computer-vision model's
//! predicted class name) to an authoritative EPPO taxonomic record, then
//! gates whether enough evidence exists to generate a natural-language
//! diagnosis. The pipeline refuses rather than guesses: four independent
//! refusal conditions (no candidates, low confidence, fact fetch failure,
//! validation failure) plus generation failure terminate a run early with a
//! reason code.
//!
//! # Module Map
//!
//! - [`normalize`] - label → [`NormalizedQuery`] (pure)
//! - [`scoring`] - composite candidate scoring (pure)
//! - [`retrieval`] - [`CandidateStore`] lookup, dedup/rank, threshold selection
//! - [`facts`] - [`FactProvider`] and the EPPO API client
//! - [`validate`] - fact/label token-overlap validation (pure)
//! - [`generate`] - [`Generator`] and the LLM-backed implementation
//! - [`pipeline`] - the orchestrating state machine and run statistics
//! - [`config`] - `VERDANT_*` environment configuration
//!
//! ## Test/Mock Support
//! Mock collaborators are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod facts;
pub mod generate;
pub mod normalize;
pub mod pipeline;
pub mod retrieval;
pub mod scoring;
pub mod validate;

pub use config::{Config, ConfigError};
pub use facts::{EppoApiClient, EppoClientConfig, FactError, FactProvider, Facts, HostPlant, ProviderStats};
pub use generate::{DEFAULT_LLM_MODEL, GenerateError, Generator, LlmGenerator};
pub use normalize::{NormalizedQuery, normalize, token_set, tokenize};
pub use pipeline::{
    DiagnosisOutcome, Pipeline, PipelineConfig, PipelineError, RefusalReason, RunStatistics, Stage,
    StatsReport,
};
pub use retrieval::{
    CandidateStore, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_MAX_CANDIDATES, Selection,
    SqliteCandidateStore, StoreError, retrieve, select,
};
pub use scoring::{Datatype, RawCandidate, ScoreWeights, ScoredCandidate, score_candidate};
pub use validate::{DEFAULT_MIN_OVERLAP, ValidationResult, validate};

#[cfg(any(test, feature = "mock"))]
pub use facts::MockFactProvider;
#[cfg(any(test, feature = "mock"))]
pub use generate::MockGenerator;
#[cfg(any(test, feature = "mock"))]
pub use retrieval::MockCandidateStore;
