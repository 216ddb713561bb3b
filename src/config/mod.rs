//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `VERDANT_*` environment
//! variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::generate::DEFAULT_LLM_MODEL;
use crate::retrieval::{DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_MAX_CANDIDATES};
use crate::validate::DEFAULT_MIN_OVERLAP;

/// Pipeline configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `VERDANT_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the EPPO Bayer SQLite dump. Default: `./eppocodes_all.sqlite`.
    pub sqlite_path: PathBuf,

    /// Directory for the on-disk fact cache. Default: `./.eppo_cache`.
    pub cache_dir: PathBuf,

    /// EPPO Global Database API key. Empty means unauthenticated requests.
    pub eppo_api_key: String,

    /// EPPO API base URL.
    pub eppo_base_url: String,

    /// LLM model identifier passed to `genai`.
    pub llm_model: String,

    /// Confidence threshold θ. Default: `0.3`.
    pub confidence_threshold: f32,

    /// Ranked-list truncation k. Default: `50`.
    pub max_candidates: usize,

    /// Validation overlap σ. Default: `1`.
    pub min_overlap: usize,

    /// Delay before each EPPO API request. Default: `200ms`.
    pub rate_limit_delay: Duration,

    /// Maximum EPPO request attempts per endpoint. Default: `3`.
    pub max_retries: u32,

    /// Concurrent diagnoses in batch mode. Default: `4`.
    pub concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sqlite_path: PathBuf::from("./eppocodes_all.sqlite"),
            cache_dir: PathBuf::from("./.eppo_cache"),
            eppo_api_key: String::new(),
            eppo_base_url: crate::facts::eppo::DEFAULT_EPPO_BASE_URL.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            min_overlap: DEFAULT_MIN_OVERLAP,
            rate_limit_delay: Duration::from_millis(200),
            max_retries: 3,
            concurrency: 4,
        }
    }
}

impl Config {
    const ENV_SQLITE_PATH: &'static str = "VERDANT_SQLITE_PATH";
    const ENV_CACHE_DIR: &'static str = "VERDANT_CACHE_DIR";
    const ENV_EPPO_API_KEY: &'static str = "VERDANT_EPPO_API_KEY";
    const ENV_EPPO_BASE_URL: &'static str = "VERDANT_EPPO_BASE_URL";
    const ENV_LLM_MODEL: &'static str = "VERDANT_LLM_MODEL";
    const ENV_THRESHOLD: &'static str = "VERDANT_CONFIDENCE_THRESHOLD";
    const ENV_MAX_CANDIDATES: &'static str = "VERDANT_MAX_CANDIDATES";
    const ENV_MIN_OVERLAP: &'static str = "VERDANT_MIN_OVERLAP";
    const ENV_RATE_LIMIT_MS: &'static str = "VERDANT_RATE_LIMIT_MS";
    const ENV_MAX_RETRIES: &'static str = "VERDANT_MAX_RETRIES";
    const ENV_CONCURRENCY: &'static str = "VERDANT_CONCURRENCY";

    /// Loads configuration from environment variables (falling back to
    /// defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            sqlite_path: Self::parse_path_from_env(Self::ENV_SQLITE_PATH, defaults.sqlite_path),
            cache_dir: Self::parse_path_from_env(Self::ENV_CACHE_DIR, defaults.cache_dir),
            eppo_api_key: Self::parse_string_from_env(
                Self::ENV_EPPO_API_KEY,
                defaults.eppo_api_key,
            ),
            eppo_base_url: Self::parse_string_from_env(
                Self::ENV_EPPO_BASE_URL,
                defaults.eppo_base_url,
            ),
            llm_model: Self::parse_string_from_env(Self::ENV_LLM_MODEL, defaults.llm_model),
            confidence_threshold: Self::parse_f32_from_env(
                Self::ENV_THRESHOLD,
                defaults.confidence_threshold,
            )?,
            max_candidates: Self::parse_usize_from_env(
                Self::ENV_MAX_CANDIDATES,
                defaults.max_candidates,
            )?,
            min_overlap: Self::parse_usize_from_env(Self::ENV_MIN_OVERLAP, defaults.min_overlap)?,
            rate_limit_delay: Duration::from_millis(Self::parse_u64_from_env(
                Self::ENV_RATE_LIMIT_MS,
                defaults.rate_limit_delay.as_millis() as u64,
            )?),
            max_retries: Self::parse_u32_from_env(Self::ENV_MAX_RETRIES, defaults.max_retries)?,
            concurrency: Self::parse_usize_from_env(Self::ENV_CONCURRENCY, defaults.concurrency)?
                .max(1),
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sqlite_path.exists() {
            return Err(ConfigError::PathNotFound {
                path: self.sqlite_path.clone(),
            });
        }
        if !self.sqlite_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.sqlite_path.clone(),
            });
        }

        if self.cache_dir.exists() && !self.cache_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.cache_dir.clone(),
            });
        }

        // NaN must be rejected explicitly; it fails every comparison and
        // would otherwise pass the selection gate for any candidate.
        if self.confidence_threshold.is_nan() || self.confidence_threshold <= 0.0 {
            return Err(ConfigError::InvalidThreshold {
                value: self.confidence_threshold,
            });
        }
        if self.max_candidates == 0 {
            return Err(ConfigError::InvalidMaxCandidates {
                value: self.max_candidates,
            });
        }

        Ok(())
    }

    fn parse_string_from_env(var_name: &'static str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_path_from_env(var_name: &'static str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_f32_from_env(var_name: &'static str, default: f32) -> Result<f32, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|e: std::num::ParseFloatError| {
                ConfigError::ParseError {
                    name: var_name,
                    value,
                    message: e.to_string(),
                }
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_u64_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::ParseError {
                    name: var_name,
                    value,
                    message: e.to_string(),
                }
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_u32_from_env(var_name: &'static str, default: u32) -> Result<u32, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::ParseError {
                    name: var_name,
                    value,
                    message: e.to_string(),
                }
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_usize_from_env(var_name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::ParseError {
                    name: var_name,
                    value,
                    message: e.to_string(),
                }
            }),
            Err(_) => Ok(default),
        }
    }
}
