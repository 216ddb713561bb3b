use super::*;
use serial_test::serial;
use std::env;
use std::path::PathBuf;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_verdant_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("VERDANT_SQLITE_PATH");
        env::remove_var("VERDANT_CACHE_DIR");
        env::remove_var("VERDANT_EPPO_API_KEY");
        env::remove_var("VERDANT_EPPO_BASE_URL");
        env::remove_var("VERDANT_LLM_MODEL");
        env::remove_var("VERDANT_CONFIDENCE_THRESHOLD");
        env::remove_var("VERDANT_MAX_CANDIDATES");
        env::remove_var("VERDANT_MIN_OVERLAP");
        env::remove_var("VERDANT_RATE_LIMIT_MS");
        env::remove_var("VERDANT_MAX_RETRIES");
        env::remove_var("VERDANT_CONCURRENCY");
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_verdant_env();
    let config = Config::default();

    assert_eq!(config.sqlite_path, PathBuf::from("./eppocodes_all.sqlite"));
    assert_eq!(config.cache_dir, PathBuf::from("./.eppo_cache"));
    assert!(config.eppo_api_key.is_empty());
    assert_eq!(config.confidence_threshold, 0.3);
    assert_eq!(config.max_candidates, 50);
    assert_eq!(config.min_overlap, 1);
    assert_eq!(config.max_retries, 3);
}

#[test]
#[serial]
fn test_from_env_defaults_when_unset() {
    clear_verdant_env();
    let config = Config::from_env().unwrap();
    assert_eq!(config.confidence_threshold, 0.3);
    assert_eq!(config.llm_model, crate::generate::DEFAULT_LLM_MODEL);
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_verdant_env();
    with_env_vars(
        &[
            ("VERDANT_SQLITE_PATH", "/tmp/eppo.sqlite"),
            ("VERDANT_CONFIDENCE_THRESHOLD", "0.45"),
            ("VERDANT_MAX_CANDIDATES", "10"),
            ("VERDANT_RATE_LIMIT_MS", "50"),
        ],
        || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.sqlite_path, PathBuf::from("/tmp/eppo.sqlite"));
            assert_eq!(config.confidence_threshold, 0.45);
            assert_eq!(config.max_candidates, 10);
            assert_eq!(config.rate_limit_delay.as_millis(), 50);
        },
    );
}

#[test]
#[serial]
fn test_from_env_rejects_bad_threshold() {
    clear_verdant_env();
    with_env_vars(&[("VERDANT_CONFIDENCE_THRESHOLD", "not-a-number")], || {
        let result = Config::from_env();
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    });
}

#[test]
#[serial]
fn test_from_env_rejects_out_of_range_max_retries() {
    clear_verdant_env();
    // One past u32::MAX: must surface as a parse error, not a truncation.
    with_env_vars(&[("VERDANT_MAX_RETRIES", "4294967296")], || {
        let result = Config::from_env();
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    });
}

#[test]
#[serial]
fn test_from_env_concurrency_floor_is_one() {
    clear_verdant_env();
    with_env_vars(&[("VERDANT_CONCURRENCY", "0")], || {
        let config = Config::from_env().unwrap();
        assert_eq!(config.concurrency, 1);
    });
}

#[test]
fn test_validate_missing_sqlite_path() {
    let config = Config {
        sqlite_path: PathBuf::from("/nonexistent/eppo.sqlite"),
        ..Config::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::PathNotFound { .. })
    ));
}

#[test]
fn test_validate_sqlite_path_must_be_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        sqlite_path: dir.path().to_path_buf(),
        ..Config::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::NotAFile { .. })));
}

#[test]
fn test_validate_rejects_zero_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("eppo.sqlite");
    std::fs::write(&db, b"").unwrap();

    let config = Config {
        sqlite_path: db,
        cache_dir: dir.path().join("cache"),
        confidence_threshold: 0.0,
        ..Config::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidThreshold { .. })
    ));
}

#[test]
fn test_validate_rejects_nan_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("eppo.sqlite");
    std::fs::write(&db, b"").unwrap();

    let config = Config {
        sqlite_path: db,
        cache_dir: dir.path().join("cache"),
        confidence_threshold: f32::NAN,
        ..Config::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidThreshold { .. })
    ));
}

#[test]
fn test_validate_accepts_sane_config() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("eppo.sqlite");
    std::fs::write(&db, b"").unwrap();

    let config = Config {
        sqlite_path: db,
        cache_dir: dir.path().join("cache"),
        ..Config::default()
    };
    assert!(config.validate().is_ok());
}
