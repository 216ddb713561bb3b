use serde::{Deserialize, Serialize};

/// Reason a diagnosis was refused.
///
/// All five are expected, user-visible terminal outcomes — not faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefusalReason {
    /// Retrieval produced no candidates (including the empty-label case).
    NoCandidates,
    /// The best candidate's score fell below the confidence threshold.
    LowConfidence,
    /// The fact provider failed or timed out.
    FactFetchFailed,
    /// Fetched facts did not support the label.
    ValidationFailed,
    /// The generator failed or returned nothing.
    GenerationFailed,
}

impl RefusalReason {
    /// Stable identifier for logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            RefusalReason::NoCandidates => "no_candidates",
            RefusalReason::LowConfidence => "low_confidence",
            RefusalReason::FactFetchFailed => "fact_fetch_failed",
            RefusalReason::ValidationFailed => "validation_failed",
            RefusalReason::GenerationFailed => "generation_failed",
        }
    }

    /// Fixed user-facing refusal message.
    pub fn message(&self) -> &'static str {
        match self {
            RefusalReason::NoCandidates => {
                "I cannot verify this diagnosis: no matching EPPO record was found for this label."
            }
            RefusalReason::LowConfidence => {
                "I cannot verify this diagnosis: the match to EPPO data is too uncertain."
            }
            RefusalReason::FactFetchFailed => {
                "I cannot verify this diagnosis: EPPO data could not be retrieved."
            }
            RefusalReason::ValidationFailed => {
                "I cannot verify this diagnosis: the retrieved EPPO data does not support this label."
            }
            RefusalReason::GenerationFailed => {
                "I cannot verify this diagnosis: the response could not be generated."
            }
        }
    }
}

impl std::fmt::Display for RefusalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline stages in execution order.
///
/// A refusal records the last stage that completed before the pipeline
/// stopped; later stages are never executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    Start,
    Normalized,
    Retrieved,
    Selected,
    FactsFetched,
    Validated,
    Completed,
}

impl Stage {
    /// Stable identifier for logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::Normalized => "normalized",
            Stage::Retrieved => "retrieved",
            Stage::Selected => "selected",
            Stage::FactsFetched => "facts_fetched",
            Stage::Validated => "validated",
            Stage::Completed => "completed",
        }
    }

    /// All stages in order, for stats reporting.
    pub fn all() -> &'static [Stage] {
        &[
            Stage::Start,
            Stage::Normalized,
            Stage::Retrieved,
            Stage::Selected,
            Stage::FactsFetched,
            Stage::Validated,
            Stage::Completed,
        ]
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of one diagnosis invocation. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DiagnosisOutcome {
    /// The pipeline declined to produce a diagnosis.
    Refused {
        /// Why the diagnosis was refused.
        reason: RefusalReason,
        /// Last stage reached before refusing.
        stage: Stage,
        /// Fixed user-facing refusal message.
        message: String,
        /// The selected eppocode, when selection had already happened.
        eppocode: Option<String>,
        /// Best observed confidence, when any candidate existed.
        confidence: Option<f32>,
    },
    /// A verified diagnosis was produced.
    Completed {
        /// The chosen EPPO code.
        eppocode: String,
        /// The selector's score, reported as confidence.
        confidence: f32,
        /// The generated diagnosis message.
        message: String,
    },
}

impl DiagnosisOutcome {
    /// Returns `true` for refusals.
    pub fn is_refused(&self) -> bool {
        matches!(self, DiagnosisOutcome::Refused { .. })
    }

    /// Returns the refusal reason, if refused.
    pub fn refusal_reason(&self) -> Option<RefusalReason> {
        match self {
            DiagnosisOutcome::Refused { reason, .. } => Some(*reason),
            DiagnosisOutcome::Completed { .. } => None,
        }
    }

    /// Returns the EPPO code attached to the outcome, if any.
    pub fn eppocode(&self) -> Option<&str> {
        match self {
            DiagnosisOutcome::Refused { eppocode, .. } => eppocode.as_deref(),
            DiagnosisOutcome::Completed { eppocode, .. } => Some(eppocode),
        }
    }

    /// Returns the reported confidence, if any.
    pub fn confidence(&self) -> Option<f32> {
        match self {
            DiagnosisOutcome::Refused { confidence, .. } => *confidence,
            DiagnosisOutcome::Completed { confidence, .. } => Some(*confidence),
        }
    }

    /// Returns the user-facing message.
    pub fn message(&self) -> &str {
        match self {
            DiagnosisOutcome::Refused { message, .. }
            | DiagnosisOutcome::Completed { message, .. } => message,
        }
    }
}

impl std::fmt::Display for DiagnosisOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosisOutcome::Refused { reason, stage, .. } => {
                write!(f, "REFUSED ({reason} at {stage})")
            }
            DiagnosisOutcome::Completed {
                eppocode,
                confidence,
                ..
            } => write!(f, "COMPLETED ({eppocode}, confidence: {confidence:.2})"),
        }
    }
}
