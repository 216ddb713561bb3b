//! End-to-end pipeline scenarios over mocked collaborators.

mod common;

use common::fixtures::{wheat_rust_facts, wheat_rust_rows};
use verdant::facts::MockFactProvider;
use verdant::generate::MockGenerator;
use verdant::pipeline::{DiagnosisOutcome, Pipeline, PipelineConfig, RefusalReason, Stage};
use verdant::retrieval::MockCandidateStore;
use verdant::scoring::{Datatype, RawCandidate};

fn default_pipeline(
    store: MockCandidateStore,
    facts: MockFactProvider,
    generator: MockGenerator,
) -> Pipeline<MockCandidateStore, MockFactProvider, MockGenerator> {
    Pipeline::new(store, facts, generator, PipelineConfig::default())
}

#[tokio::test]
async fn scenario_wheat_leaf_rust_is_verified() {
    // "Wheat leaf rust" vs "rust of wheat" (GAF): overlap 2/3 + datatype
    // bonus 0.15 ≈ 0.817, well above the 0.3 threshold.
    let pipeline = default_pipeline(
        MockCandidateStore::new(wheat_rust_rows()),
        MockFactProvider::new(wheat_rust_facts()),
        MockGenerator::new("Confirmed: wheat leaf rust caused by Puccinia triticina."),
    );

    let outcome = pipeline.diagnose("Wheat leaf rust").await.unwrap();

    match outcome {
        DiagnosisOutcome::Completed {
            eppocode,
            confidence,
            message,
        } => {
            assert_eq!(eppocode, "PUCCRT");
            assert!((confidence - (2.0 / 3.0 + 0.15)).abs() < 1e-3);
            assert!(message.contains("Puccinia"));
        }
        other => panic!("expected completion, got {other}"),
    }

    assert_eq!(pipeline.fact_provider().fetch_calls(), 1);
    assert_eq!(pipeline.generator().generate_calls(), 1);
    assert_eq!(pipeline.stats().completed(), 1);
}

#[tokio::test]
async fn scenario_garbage_label_refuses_without_network_cost() {
    // "xyz qq": "qq" survives length filtering but matches nothing in an
    // empty store; the refusal costs zero provider/generator calls.
    let pipeline = default_pipeline(
        MockCandidateStore::empty(),
        MockFactProvider::new(wheat_rust_facts()),
        MockGenerator::new("unused"),
    );

    let outcome = pipeline.diagnose("xyz qq").await.unwrap();

    assert_eq!(outcome.refusal_reason(), Some(RefusalReason::NoCandidates));
    assert_eq!(pipeline.fact_provider().fetch_calls(), 0);
    assert_eq!(pipeline.generator().generate_calls(), 0);
}

#[tokio::test]
async fn scenario_low_confidence_refuses_before_fact_fetch() {
    // Best candidate scores 0.25 < θ = 0.3: refusal, provider untouched.
    let pipeline = default_pipeline(
        MockCandidateStore::new(vec![RawCandidate::new(
            "BROWNX",
            Datatype::Other,
            "brown mold",
        )]),
        MockFactProvider::new(wheat_rust_facts()),
        MockGenerator::new("unused"),
    );

    let outcome = pipeline.diagnose("brown spot necrosis lesion").await.unwrap();

    assert_eq!(outcome.refusal_reason(), Some(RefusalReason::LowConfidence));
    assert_eq!(outcome.confidence(), Some(0.25));
    assert_eq!(pipeline.fact_provider().fetch_calls(), 0);
    assert_eq!(pipeline.generator().generate_calls(), 0);
}

#[tokio::test]
async fn scenario_disjoint_facts_fail_validation() {
    // Candidate selected, facts fetched, but the evidence shares no token
    // with the query: validation refuses and generation never runs.
    let disjoint_facts = verdant::facts::Facts {
        eppocode: "PUCCRT".to_string(),
        preferred_name: Some("Completely unrelated organism".to_string()),
        common_names: Vec::new(),
        hosts: Vec::new(),
    };
    let pipeline = default_pipeline(
        MockCandidateStore::new(wheat_rust_rows()),
        MockFactProvider::new(disjoint_facts),
        MockGenerator::new("unused"),
    );

    let outcome = pipeline.diagnose("Wheat leaf rust").await.unwrap();

    assert_eq!(outcome.refusal_reason(), Some(RefusalReason::ValidationFailed));
    assert_eq!(outcome.eppocode(), Some("PUCCRT"));
    assert_eq!(pipeline.fact_provider().fetch_calls(), 1);
    assert_eq!(pipeline.generator().generate_calls(), 0);
    match outcome {
        DiagnosisOutcome::Refused { stage, .. } => assert_eq!(stage, Stage::FactsFetched),
        _ => panic!("expected refusal"),
    }
}

#[tokio::test]
async fn refusal_outcomes_serialize_with_reason_codes() {
    let pipeline = default_pipeline(
        MockCandidateStore::empty(),
        MockFactProvider::new(wheat_rust_facts()),
        MockGenerator::new("unused"),
    );

    let outcome = pipeline.diagnose("Wheat leaf rust").await.unwrap();
    let json = serde_json::to_string(&outcome).unwrap();
    assert!(json.contains("NoCandidates"));
    assert!(json.contains("Retrieved"));
}

#[tokio::test]
async fn concurrent_invocations_share_statistics() {
    use std::sync::Arc;
    use verdant::pipeline::RunStatistics;

    let stats = Arc::new(RunStatistics::new());
    let pipeline = Arc::new(Pipeline::with_stats(
        MockCandidateStore::new(wheat_rust_rows()),
        MockFactProvider::new(wheat_rust_facts()),
        MockGenerator::new("ok"),
        PipelineConfig::default(),
        Arc::clone(&stats),
    ));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let pipeline = Arc::clone(&pipeline);
        handles.push(tokio::spawn(async move {
            pipeline.diagnose("Wheat leaf rust").await.unwrap()
        }));
    }
    for handle in handles {
        let outcome = handle.await.unwrap();
        assert!(!outcome.is_refused());
    }

    assert_eq!(stats.completed(), 8);
    assert_eq!(stats.total(), 8);
}
