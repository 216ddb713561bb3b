//! The diagnosis state machine.
//!
//! Sequences normalize → retrieve → select → fetch facts → validate →
//! generate, with early-exit refusal semantics: every transition into
//! `Refused` is terminal, records the stage reached, and executes no later
//! stage. Refusing at selection must incur zero downstream network cost —
//! the fact provider and generator are only touched after a candidate clears
//! the confidence threshold.

pub mod outcome;
pub mod stats;


pub use outcome::{DiagnosisOutcome, RefusalReason, Stage};
pub use stats::{RunStatistics, StatsReport};

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::facts::FactProvider;
use crate::generate::Generator;
use crate::normalize::normalize;
use crate::retrieval::{
    CandidateStore, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_MAX_CANDIDATES, Selection, StoreError,
    retrieve, select,
};
use crate::scoring::ScoreWeights;
use crate::validate::{DEFAULT_MIN_OVERLAP, validate};

/// Hard pipeline faults.
///
/// Only a broken collaborator interface lands here; refusals never do.
/// Keeping the two apart prevents "no evidence" from masking "infrastructure
/// broken".
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The candidate store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Tunable pipeline settings.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Scoring coefficients.
    pub weights: ScoreWeights,
    /// Confidence threshold θ applied at selection.
    pub confidence_threshold: f32,
    /// Ranked-list truncation k.
    pub max_candidates: usize,
    /// Validation overlap σ.
    pub min_overlap: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            min_overlap: DEFAULT_MIN_OVERLAP,
        }
    }
}

impl PipelineConfig {
    /// Sets the confidence threshold θ.
    pub fn confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Sets the ranked-list truncation k.
    pub fn max_candidates(mut self, k: usize) -> Self {
        self.max_candidates = k;
        self
    }

    /// Sets the validation overlap σ.
    pub fn min_overlap(mut self, overlap: usize) -> Self {
        self.min_overlap = overlap;
        self
    }

    /// Sets the scoring coefficients.
    pub fn weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }
}

/// The refusal-aware diagnosis pipeline over its three collaborators.
pub struct Pipeline<S, F, G> {
    store: S,
    facts: F,
    generator: G,
    config: PipelineConfig,
    stats: Arc<RunStatistics>,
}

impl<S, F, G> std::fmt::Debug for Pipeline<S, F, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").field("config", &self.config).finish()
    }
}

impl<S, F, G> Pipeline<S, F, G>
where
    S: CandidateStore,
    F: FactProvider,
    G: Generator,
{
    /// Creates a pipeline over the given collaborators.
    pub fn new(store: S, facts: F, generator: G, config: PipelineConfig) -> Self {
        Self {
            store,
            facts,
            generator,
            config,
            stats: Arc::new(RunStatistics::new()),
        }
    }

    /// Creates a pipeline sharing an existing statistics accumulator.
    pub fn with_stats(
        store: S,
        facts: F,
        generator: G,
        config: PipelineConfig,
        stats: Arc<RunStatistics>,
    ) -> Self {
        Self {
            store,
            facts,
            generator,
            config,
            stats,
        }
    }

    /// Returns the shared statistics accumulator.
    pub fn stats(&self) -> &Arc<RunStatistics> {
        &self.stats
    }

    /// Returns the candidate store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the fact provider.
    pub fn fact_provider(&self) -> &F {
        &self.facts
    }

    /// Returns the generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Returns the pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn refuse(
        &self,
        reason: RefusalReason,
        stage: Stage,
        eppocode: Option<String>,
        confidence: Option<f32>,
    ) -> DiagnosisOutcome {
        self.stats.record_refusal(reason);
        info!(reason = %reason, stage = %stage, "diagnosis refused");
        DiagnosisOutcome::Refused {
            reason,
            stage,
            message: reason.message().to_string(),
            eppocode,
            confidence,
        }
    }

    /// Runs one diagnosis invocation for `label`.
    ///
    /// Refusals are `Ok` outcomes; only hard collaborator faults surface as
    /// `Err`.
    #[instrument(skip(self, label), fields(label_len = label.len()))]
    pub async fn diagnose(&self, label: &str) -> Result<DiagnosisOutcome, PipelineError> {
        // Start -> Normalized. Never fails; an empty label just yields an
        // empty query and falls through to NoCandidates.
        let started = Instant::now();
        let query = normalize(label);
        self.stats.record_latency(Stage::Normalized, started.elapsed());
        debug!(tokens = query.tokens.len(), hosts = query.host_terms.len(), "label normalized");

        // Normalized -> Retrieved. Store faults are hard errors, not refusals.
        let started = Instant::now();
        let ranked = retrieve(
            &query,
            &self.store,
            &self.config.weights,
            self.config.max_candidates,
        )
        .await?;
        self.stats.record_latency(Stage::Retrieved, started.elapsed());
        debug!(candidates = ranked.len(), "candidates ranked");

        // Retrieved -> Selected | Refused. Must short-circuit before any
        // external call.
        let started = Instant::now();
        let selection = select(&ranked, self.config.confidence_threshold);
        self.stats.record_latency(Stage::Selected, started.elapsed());

        let selected = match selection {
            Selection::Selected(candidate) => candidate,
            Selection::NoCandidates => {
                return Ok(self.refuse(RefusalReason::NoCandidates, Stage::Retrieved, None, None));
            }
            Selection::LowConfidence { best_score } => {
                return Ok(self.refuse(
                    RefusalReason::LowConfidence,
                    Stage::Retrieved,
                    None,
                    Some(best_score),
                ));
            }
        };
        info!(
            eppocode = %selected.eppocode,
            score = selected.score,
            datatype = %selected.datatype,
            "candidate selected"
        );

        // Selected -> FactsFetched | Refused. Any provider failure collapses
        // to one refusal reason.
        let started = Instant::now();
        let facts = match self.facts.fetch_facts(&selected.eppocode).await {
            Ok(facts) => facts,
            Err(e) => {
                warn!(eppocode = %selected.eppocode, error = %e, "fact fetch failed");
                return Ok(self.refuse(
                    RefusalReason::FactFetchFailed,
                    Stage::Selected,
                    Some(selected.eppocode),
                    Some(selected.score),
                ));
            }
        };
        self.stats.record_latency(Stage::FactsFetched, started.elapsed());

        // FactsFetched -> Validated | Refused.
        let started = Instant::now();
        let validation = validate(&facts, &query, self.config.min_overlap);
        self.stats.record_latency(Stage::Validated, started.elapsed());
        if !validation.is_supported() {
            debug!(overlap = validation.overlap(), "fact validation rejected the label");
            return Ok(self.refuse(
                RefusalReason::ValidationFailed,
                Stage::FactsFetched,
                Some(selected.eppocode),
                Some(selected.score),
            ));
        }

        // Validated -> Completed | Refused.
        let started = Instant::now();
        let message = match self.generator.generate(&query.original, &facts).await {
            Ok(message) => message,
            Err(e) => {
                warn!(eppocode = %selected.eppocode, error = %e, "generation failed");
                return Ok(self.refuse(
                    RefusalReason::GenerationFailed,
                    Stage::Validated,
                    Some(selected.eppocode),
                    Some(selected.score),
                ));
            }
        };
        self.stats.record_latency(Stage::Completed, started.elapsed());

        self.stats.record_completion();
        info!(eppocode = %selected.eppocode, confidence = selected.score, "diagnosis completed");
        Ok(DiagnosisOutcome::Completed {
            eppocode: selected.eppocode,
            confidence: selected.score,
            message,
        })
    }
}
