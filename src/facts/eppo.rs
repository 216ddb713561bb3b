use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::sync::Cache;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{FactError, FactProvider, Facts, HostPlant};

/// Default EPPO Global Database API base URL.
pub const DEFAULT_EPPO_BASE_URL: &str = "https://api.eppo.int/gd/v2";

const ENDPOINT_OVERVIEW: &str = "overview";
const ENDPOINT_NAMES: &str = "names";
const ENDPOINT_HOSTS: &str = "hosts";

/// Caps the backoff exponent so large retry settings cannot overflow the
/// multiplication (500ms * 2^6 = 32s per wait at most).
const MAX_BACKOFF_EXPONENT: u32 = 6;

/// Backoff before retry `attempt` (1-based; attempt 0 is the first try and
/// never waits).
pub(crate) fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(500) * 2u32.pow(attempt.saturating_sub(1).min(MAX_BACKOFF_EXPONENT))
}

/// Configuration for [`EppoApiClient`].
#[derive(Debug, Clone)]
pub struct EppoClientConfig {
    /// API key sent as `X-Api-Key`. Empty means unauthenticated requests.
    pub api_key: String,
    /// API base URL.
    pub base_url: String,
    /// Directory for the on-disk JSON response cache. `None` disables it.
    pub cache_dir: Option<PathBuf>,
    /// Delay inserted before every API request (rate-limit compliance).
    pub rate_limit_delay: Duration,
    /// Maximum request attempts per endpoint.
    pub max_retries: u32,
    /// Max entries in the in-memory facts cache.
    pub memory_capacity: u64,
}

impl Default for EppoClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_EPPO_BASE_URL.to_string(),
            cache_dir: None,
            rate_limit_delay: Duration::from_millis(200),
            max_retries: 3,
            memory_capacity: 10_000,
        }
    }
}

impl EppoClientConfig {
    /// Sets the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Enables the on-disk response cache under `dir`.
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Sets the per-request rate-limit delay.
    pub fn rate_limit_delay(mut self, delay: Duration) -> Self {
        self.rate_limit_delay = delay;
        self
    }

    /// Sets the maximum request attempts.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries.max(1);
        self
    }
}

/// Cache/API counters exposed for end-of-run reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProviderStats {
    /// Responses served from the memory or disk cache.
    pub cache_hits: u64,
    /// Lookups that had to go to the API.
    pub cache_misses: u64,
    /// HTTP requests issued (including retries).
    pub api_calls: u64,
}

/// Fact provider backed by the EPPO Global Database API.
///
/// Two cache levels sit in front of the API: a moka in-memory cache of
/// assembled [`Facts`] and an on-disk JSON cache of raw endpoint responses
/// (`<cache_dir>/taxons/<code>/<endpoint>.json`). Disk-cache write failures
/// are logged and ignored; a cold cache is always recoverable from the API.
pub struct EppoApiClient {
    http: reqwest::Client,
    config: EppoClientConfig,
    memory: Cache<String, Facts>,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    api_calls: AtomicU64,
}

impl std::fmt::Debug for EppoApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EppoApiClient")
            .field("base_url", &self.config.base_url)
            .field("cache_dir", &self.config.cache_dir)
            .finish()
    }
}

impl EppoApiClient {
    /// Creates a client from `config`.
    pub fn new(config: EppoClientConfig) -> Self {
        let memory = Cache::builder()
            .max_capacity(config.memory_capacity)
            .build();
        Self {
            http: reqwest::Client::new(),
            config,
            memory,
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            api_calls: AtomicU64::new(0),
        }
    }

    /// Returns a snapshot of the cache/API counters.
    pub fn stats(&self) -> ProviderStats {
        ProviderStats {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            api_calls: self.api_calls.load(Ordering::Relaxed),
        }
    }

    fn cache_file(&self, eppocode: &str, endpoint: &str) -> Option<PathBuf> {
        self.config
            .cache_dir
            .as_ref()
            .map(|dir| dir.join("taxons").join(eppocode).join(format!("{endpoint}.json")))
    }

    async fn load_cached(&self, eppocode: &str, endpoint: &str) -> Option<Value> {
        let path = self.cache_file(eppocode, endpoint)?;
        tokio::task::spawn_blocking(move || {
            let bytes = std::fs::read(&path).ok()?;
            serde_json::from_slice(&bytes).ok()
        })
        .await
        .ok()
        .flatten()
    }

    async fn save_cached(&self, eppocode: &str, endpoint: &str, data: &Value) {
        let Some(path) = self.cache_file(eppocode, endpoint) else {
            return;
        };
        let data = data.clone();
        let written = tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, serde_json::to_vec(&data)?)
        })
        .await;
        match written {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                debug!(endpoint, eppocode, error = %e, "failed to write fact cache file");
            }
            Err(e) => {
                debug!(endpoint, eppocode, error = %e, "fact cache write task failed");
            }
        }
    }

    async fn get_endpoint(&self, eppocode: &str, endpoint: &str) -> Result<Value, FactError> {
        if let Some(cached) = self.load_cached(eppocode, endpoint).await {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            debug!(endpoint, eppocode, "disk cache hit");
            return Ok(cached);
        }
        self.cache_misses.fetch_add(1, Ordering::Relaxed);

        let url = format!(
            "{}/taxons/taxon/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            eppocode,
            endpoint
        );

        let mut last_error = String::new();
        for attempt in 0..self.config.max_retries {
            if attempt > 0 {
                tokio::time::sleep(backoff_delay(attempt)).await;
            }
            tokio::time::sleep(self.config.rate_limit_delay).await;
            self.api_calls.fetch_add(1, Ordering::Relaxed);

            let mut request = self.http.get(&url).timeout(Duration::from_secs(30));
            if !self.config.api_key.is_empty() {
                request = request.header("X-Api-Key", &self.config.api_key);
            }

            match request.send().await.and_then(|r| r.error_for_status()) {
                Ok(response) => match response.json::<Value>().await {
                    Ok(data) => {
                        self.save_cached(eppocode, endpoint, &data).await;
                        return Ok(data);
                    }
                    Err(e) => last_error = e.to_string(),
                },
                Err(e) => last_error = e.to_string(),
            }
            debug!(endpoint, eppocode, attempt, error = %last_error, "EPPO request attempt failed");
        }

        Err(FactError::RequestFailed {
            eppocode: eppocode.to_string(),
            message: last_error,
        })
    }

    fn parse_facts(eppocode: &str, overview: &Value, names: Value, hosts: Value) -> Facts {
        let preferred_name = overview
            .get("prefname")
            .and_then(Value::as_str)
            .map(str::to_string);

        let common_names = names
            .as_array()
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|e| e.get("fullname").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let hosts = hosts
            .as_array()
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|e| {
                        let name = e.get("prefname").and_then(Value::as_str)?;
                        Some(HostPlant {
                            name: name.to_string(),
                            class_label: e
                                .get("class_label")
                                .and_then(Value::as_str)
                                .map(str::to_string),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Facts {
            eppocode: eppocode.to_string(),
            preferred_name,
            common_names,
            hosts,
        }
    }
}

impl FactProvider for EppoApiClient {
    async fn fetch_facts(&self, eppocode: &str) -> Result<Facts, FactError> {
        if let Some(facts) = self.memory.get(eppocode) {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            debug!(eppocode, "memory cache hit");
            return Ok(facts);
        }

        // The overview record is mandatory evidence; names and hosts only
        // enrich it, so their failures degrade to empty lists.
        let overview = self.get_endpoint(eppocode, ENDPOINT_OVERVIEW).await?;
        if overview.is_null() {
            return Err(FactError::MissingOverview {
                eppocode: eppocode.to_string(),
            });
        }

        let names = match self.get_endpoint(eppocode, ENDPOINT_NAMES).await {
            Ok(value) => value,
            Err(e) => {
                warn!(eppocode, error = %e, "names endpoint failed, continuing without");
                Value::Null
            }
        };
        let hosts = match self.get_endpoint(eppocode, ENDPOINT_HOSTS).await {
            Ok(value) => value,
            Err(e) => {
                warn!(eppocode, error = %e, "hosts endpoint failed, continuing without");
                Value::Null
            }
        };

        let facts = Self::parse_facts(eppocode, &overview, names, hosts);
        if facts.preferred_name.is_none() {
            return Err(FactError::MissingOverview {
                eppocode: eppocode.to_string(),
            });
        }

        self.memory.insert(eppocode.to_string(), facts.clone());
        Ok(facts)
    }
}
