use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;

use super::outcome::{RefusalReason, Stage};

/// Process-wide run accumulator shared by concurrent diagnosis invocations.
///
/// Counters are atomic; latency samples sit behind a `parking_lot` mutex
/// taken once per stage transition. Reset only on explicit caller request.
#[derive(Debug, Default)]
pub struct RunStatistics {
    completed: AtomicU64,
    no_candidates: AtomicU64,
    low_confidence: AtomicU64,
    fact_fetch_failed: AtomicU64,
    validation_failed: AtomicU64,
    generation_failed: AtomicU64,
    latencies: Mutex<BTreeMap<Stage, Vec<Duration>>>,
}

/// Serializable snapshot of [`RunStatistics`], for end-of-run reporting.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub completed: u64,
    pub refused: u64,
    pub refusals_by_reason: BTreeMap<&'static str, u64>,
    /// Mean observed latency per stage, in milliseconds.
    pub mean_stage_latency_ms: BTreeMap<&'static str, f64>,
}

impl RunStatistics {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    fn refusal_counter(&self, reason: RefusalReason) -> &AtomicU64 {
        match reason {
            RefusalReason::NoCandidates => &self.no_candidates,
            RefusalReason::LowConfidence => &self.low_confidence,
            RefusalReason::FactFetchFailed => &self.fact_fetch_failed,
            RefusalReason::ValidationFailed => &self.validation_failed,
            RefusalReason::GenerationFailed => &self.generation_failed,
        }
    }

    /// Records a refusal with `reason`.
    pub fn record_refusal(&self, reason: RefusalReason) {
        self.refusal_counter(reason).fetch_add(1, Ordering::Relaxed);
    }

    /// Records a completed diagnosis.
    pub fn record_completion(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records the latency of one stage transition.
    pub fn record_latency(&self, stage: Stage, elapsed: Duration) {
        self.latencies.lock().entry(stage).or_default().push(elapsed);
    }

    /// Number of completed diagnoses.
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Number of refusals with `reason`.
    pub fn refusals(&self, reason: RefusalReason) -> u64 {
        self.refusal_counter(reason).load(Ordering::Relaxed)
    }

    /// Total refusals across all reasons.
    pub fn total_refused(&self) -> u64 {
        [
            RefusalReason::NoCandidates,
            RefusalReason::LowConfidence,
            RefusalReason::FactFetchFailed,
            RefusalReason::ValidationFailed,
            RefusalReason::GenerationFailed,
        ]
        .iter()
        .map(|r| self.refusals(*r))
        .sum()
    }

    /// Total invocations observed.
    pub fn total(&self) -> u64 {
        self.completed() + self.total_refused()
    }

    /// Clears all counters and latency samples.
    pub fn reset(&self) {
        self.completed.store(0, Ordering::Relaxed);
        self.no_candidates.store(0, Ordering::Relaxed);
        self.low_confidence.store(0, Ordering::Relaxed);
        self.fact_fetch_failed.store(0, Ordering::Relaxed);
        self.validation_failed.store(0, Ordering::Relaxed);
        self.generation_failed.store(0, Ordering::Relaxed);
        self.latencies.lock().clear();
    }

    /// Builds a serializable snapshot.
    pub fn report(&self) -> StatsReport {
        let refusals_by_reason: BTreeMap<&'static str, u64> = [
            RefusalReason::NoCandidates,
            RefusalReason::LowConfidence,
            RefusalReason::FactFetchFailed,
            RefusalReason::ValidationFailed,
            RefusalReason::GenerationFailed,
        ]
        .iter()
        .map(|r| (r.as_str(), self.refusals(*r)))
        .collect();

        let latencies = self.latencies.lock();
        let mean_stage_latency_ms = Stage::all()
            .iter()
            .filter_map(|stage| {
                let samples = latencies.get(stage)?;
                if samples.is_empty() {
                    return None;
                }
                let total: Duration = samples.iter().sum();
                Some((
                    stage.as_str(),
                    total.as_secs_f64() * 1000.0 / samples.len() as f64,
                ))
            })
            .collect();

        StatsReport {
            completed: self.completed(),
            refused: self.total_refused(),
            refusals_by_reason,
            mean_stage_latency_ms,
        }
    }
}
