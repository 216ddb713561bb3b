//! Externally fetched evidence for a selected EPPO code.
//!
//! The pipeline consumes facts through the [`FactProvider`] trait; the real
//! implementation ([`EppoApiClient`]) talks to the EPPO Global Database API
//! with its own caching and retry policy. Any provider failure collapses to a
//! single refusal reason upstream — the orchestrator never interprets
//! provider-specific errors.

pub mod eppo;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use eppo::{EppoApiClient, EppoClientConfig, ProviderStats};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockFactProvider;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::normalize::token_set;

/// Errors raised by a fact provider.
#[derive(Debug, Error)]
pub enum FactError {
    /// The provider could not produce a response (network, auth, timeout).
    #[error("fact fetch failed for {eppocode}: {message}")]
    RequestFailed { eppocode: String, message: String },

    /// The provider responded but returned no overview record.
    #[error("no overview record for {eppocode}")]
    MissingOverview { eppocode: String },
}

/// A host plant entry attached to a taxon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPlant {
    /// Preferred name of the host.
    pub name: String,
    /// Host classification label (e.g. "Major host"), when provided.
    pub class_label: Option<String>,
}

/// Evidence bundle for one EPPO code, treated as read-only input to
/// validation and generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facts {
    /// The EPPO code these facts describe.
    pub eppocode: String,
    /// Preferred name from the overview record.
    pub preferred_name: Option<String>,
    /// Other recorded names for the taxon.
    pub common_names: Vec<String>,
    /// Host plants affected by the taxon.
    pub hosts: Vec<HostPlant>,
}

impl Facts {
    /// Returns every text fragment usable as validation evidence.
    pub fn texts(&self) -> Vec<&str> {
        let mut texts: Vec<&str> = Vec::new();
        if let Some(name) = &self.preferred_name {
            texts.push(name);
        }
        texts.extend(self.common_names.iter().map(String::as_str));
        texts.extend(self.hosts.iter().map(|h| h.name.as_str()));
        texts
    }

    /// Tokenizes all fact texts with the same rules as label normalization.
    pub fn tokens(&self) -> BTreeSet<String> {
        token_set(&self.texts().join(" "))
    }
}

/// Minimal async interface over whatever service supplies taxon facts.
///
/// Caching, authentication, rate limits, and retries are entirely the
/// provider's concern; the core only sees success or failure.
pub trait FactProvider: Send + Sync {
    /// Fetches the evidence bundle for `eppocode`.
    fn fetch_facts(
        &self,
        eppocode: &str,
    ) -> impl std::future::Future<Output = Result<Facts, FactError>> + Send;
}
