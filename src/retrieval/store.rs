use std::collections::BTreeSet;
use std::path::PathBuf;

use thiserror::Error;

use crate::scoring::RawCandidate;

/// Errors raised by a candidate store.
///
/// These are infrastructure faults, not refusals: a broken or missing store
/// propagates as a hard error so that "no evidence" and "database broken"
/// stay distinguishable.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing database file does not exist.
    #[error("candidate database not found at {}", path.display())]
    DatabaseNotFound { path: PathBuf },

    /// Opening the database failed.
    #[error("failed to open candidate database: {message}")]
    OpenFailed { message: String },

    /// A lookup query failed.
    #[error("candidate lookup failed: {message}")]
    QueryFailed { message: String },

    /// The blocking lookup task panicked or was cancelled.
    #[error("candidate lookup task failed: {message}")]
    TaskFailed { message: String },
}

/// Minimal async interface over whatever engine holds EPPO name records.
///
/// `lookup` must return a superset of plausible matches for the given tokens
/// (partial/substring matching is the store's choice); ordering is not
/// required — the retriever scores and sorts independently. An empty token
/// set yields an empty result, not an error.
pub trait CandidateStore: Send + Sync {
    /// Looks up raw candidate rows matching any of `tokens`.
    fn lookup(
        &self,
        tokens: &BTreeSet<String>,
    ) -> impl std::future::Future<Output = Result<Vec<RawCandidate>, StoreError>> + Send;
}
