use std::time::Duration;

use serde_json::json;

use super::eppo::{EppoApiClient, EppoClientConfig, backoff_delay};
use super::{FactError, FactProvider, Facts, HostPlant};

fn sample_facts() -> Facts {
    Facts {
        eppocode: "PUCCRT".to_string(),
        preferred_name: Some("Puccinia triticina".to_string()),
        common_names: vec!["wheat leaf rust".to_string(), "brown rust".to_string()],
        hosts: vec![HostPlant {
            name: "Triticum aestivum".to_string(),
            class_label: Some("Major host".to_string()),
        }],
    }
}

#[test]
fn test_facts_texts_collects_all_sources() {
    let facts = sample_facts();
    let texts = facts.texts();
    assert!(texts.contains(&"Puccinia triticina"));
    assert!(texts.contains(&"wheat leaf rust"));
    assert!(texts.contains(&"Triticum aestivum"));
}

#[test]
fn test_facts_tokens_use_normalization_rules() {
    let facts = sample_facts();
    let tokens = facts.tokens();
    assert!(tokens.contains("rust"));
    assert!(tokens.contains("wheat"));
    assert!(tokens.contains("puccinia"));
    // Short and duplicate tokens are gone.
    assert!(!tokens.contains("a"));
}

#[test]
fn test_backoff_delay_doubles_then_caps() {
    assert_eq!(backoff_delay(1), Duration::from_millis(500));
    assert_eq!(backoff_delay(2), Duration::from_millis(1000));
    assert_eq!(backoff_delay(3), Duration::from_millis(2000));
    // Large attempt counts must not overflow; the wait is capped instead.
    let capped = backoff_delay(7);
    assert_eq!(backoff_delay(40), capped);
    assert_eq!(backoff_delay(u32::MAX), capped);
}

#[test]
fn test_facts_default_is_empty_evidence() {
    let facts = Facts::default();
    assert!(facts.texts().is_empty());
    assert!(facts.tokens().is_empty());
}

fn write_cache_file(dir: &std::path::Path, eppocode: &str, endpoint: &str, data: &serde_json::Value) {
    let path = dir.join("taxons").join(eppocode).join(format!("{endpoint}.json"));
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, serde_json::to_vec(data).unwrap()).unwrap();
}

fn cached_client(dir: &std::path::Path) -> EppoApiClient {
    // Unroutable base URL: every test below must be served from cache.
    EppoApiClient::new(
        EppoClientConfig::default()
            .base_url("http://127.0.0.1:1")
            .cache_dir(dir)
            .rate_limit_delay(Duration::ZERO)
            .max_retries(1),
    )
}

#[tokio::test]
async fn test_eppo_client_serves_from_disk_cache() {
    let dir = tempfile::tempdir().unwrap();
    write_cache_file(
        dir.path(),
        "PUCCRT",
        "overview",
        &json!({"prefname": "Puccinia triticina"}),
    );
    write_cache_file(
        dir.path(),
        "PUCCRT",
        "names",
        &json!([{"fullname": "wheat leaf rust"}]),
    );
    write_cache_file(
        dir.path(),
        "PUCCRT",
        "hosts",
        &json!([{"prefname": "Triticum aestivum", "class_label": "Major host"}]),
    );

    let client = cached_client(dir.path());
    let facts = client.fetch_facts("PUCCRT").await.unwrap();

    assert_eq!(facts.preferred_name.as_deref(), Some("Puccinia triticina"));
    assert_eq!(facts.common_names, vec!["wheat leaf rust".to_string()]);
    assert_eq!(facts.hosts.len(), 1);
    assert_eq!(facts.hosts[0].class_label.as_deref(), Some("Major host"));

    let stats = client.stats();
    assert_eq!(stats.cache_hits, 3);
    assert_eq!(stats.api_calls, 0);
}

#[tokio::test]
async fn test_eppo_client_memory_cache_skips_disk_on_second_fetch() {
    let dir = tempfile::tempdir().unwrap();
    write_cache_file(
        dir.path(),
        "PUCCRT",
        "overview",
        &json!({"prefname": "Puccinia triticina"}),
    );
    write_cache_file(dir.path(), "PUCCRT", "names", &json!([]));
    write_cache_file(dir.path(), "PUCCRT", "hosts", &json!([]));

    let client = cached_client(dir.path());
    let first = client.fetch_facts("PUCCRT").await.unwrap();
    let hits_after_first = client.stats().cache_hits;

    let second = client.fetch_facts("PUCCRT").await.unwrap();
    assert_eq!(first, second);
    // Exactly one additional hit: the memory cache, not three disk reads.
    assert_eq!(client.stats().cache_hits, hits_after_first + 1);
}

#[tokio::test]
async fn test_eppo_client_null_overview_is_missing_overview() {
    let dir = tempfile::tempdir().unwrap();
    write_cache_file(dir.path(), "BADCOD", "overview", &json!(null));

    let client = cached_client(dir.path());
    let result = client.fetch_facts("BADCOD").await;
    assert!(matches!(result, Err(FactError::MissingOverview { .. })));
}

#[tokio::test]
async fn test_eppo_client_overview_without_prefname_is_missing_overview() {
    let dir = tempfile::tempdir().unwrap();
    write_cache_file(dir.path(), "BADCOD", "overview", &json!({"other": 1}));
    write_cache_file(dir.path(), "BADCOD", "names", &json!([]));
    write_cache_file(dir.path(), "BADCOD", "hosts", &json!([]));

    let client = cached_client(dir.path());
    let result = client.fetch_facts("BADCOD").await;
    assert!(matches!(result, Err(FactError::MissingOverview { .. })));
}

#[tokio::test]
async fn test_eppo_client_unreachable_api_is_request_failed() {
    let dir = tempfile::tempdir().unwrap();
    let client = cached_client(dir.path());

    let result = client.fetch_facts("PUCCRT").await;
    assert!(matches!(result, Err(FactError::RequestFailed { .. })));
    assert!(client.stats().api_calls >= 1);
}

#[tokio::test]
async fn test_eppo_client_tolerates_missing_names_and_hosts() {
    // Only the overview is cached; names/hosts fall back to empty lists even
    // though their requests fail.
    let dir = tempfile::tempdir().unwrap();
    write_cache_file(
        dir.path(),
        "PUCCRT",
        "overview",
        &json!({"prefname": "Puccinia triticina"}),
    );

    let client = cached_client(dir.path());
    let facts = client.fetch_facts("PUCCRT").await.unwrap();
    assert!(facts.common_names.is_empty());
    assert!(facts.hosts.is_empty());
}
