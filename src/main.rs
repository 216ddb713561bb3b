//! Verdant CLI entrypoint: batch diagnosis over disease labels.

use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream;
use mimalloc::MiMalloc;

use verdant::config::Config;
use verdant::facts::{EppoApiClient, EppoClientConfig};
use verdant::generate::LlmGenerator;
use verdant::pipeline::{Pipeline, PipelineConfig, RunStatistics};
use verdant::retrieval::SqliteCandidateStore;
use verdant::scoring::ScoreWeights;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Demo labels used when none are passed on the command line.
const DEMO_LABELS: &[&str] = &[
    "Rice leaf blast",
    "Wheat leaf rust",
    "Potato leaf late blight",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!(
        database = %config.sqlite_path.display(),
        threshold = config.confidence_threshold,
        model = %config.llm_model,
        "verdant starting"
    );
    if config.eppo_api_key.is_empty() {
        tracing::warn!("no EPPO API key configured, requests will be unauthenticated");
    }

    let store = SqliteCandidateStore::new(config.sqlite_path.clone());
    let provider = EppoApiClient::new(
        EppoClientConfig::default()
            .api_key(config.eppo_api_key.clone())
            .base_url(config.eppo_base_url.clone())
            .cache_dir(config.cache_dir.clone())
            .rate_limit_delay(config.rate_limit_delay)
            .max_retries(config.max_retries),
    );
    let generator = LlmGenerator::new(config.llm_model.clone());

    let stats = Arc::new(RunStatistics::new());
    let pipeline_config = PipelineConfig::default()
        .confidence_threshold(config.confidence_threshold)
        .max_candidates(config.max_candidates)
        .min_overlap(config.min_overlap)
        .weights(ScoreWeights::default());
    let pipeline = Arc::new(Pipeline::with_stats(
        store,
        provider,
        generator,
        pipeline_config,
        Arc::clone(&stats),
    ));

    let labels: Vec<String> = {
        let args: Vec<String> = std::env::args().skip(1).collect();
        if args.is_empty() {
            DEMO_LABELS.iter().map(|s| s.to_string()).collect()
        } else {
            args
        }
    };

    // Invocations are independent; run them with bounded concurrency and let
    // the rate limits live where they belong, in the collaborators.
    let outcomes: Vec<_> = stream::iter(labels)
        .map(|label| {
            let pipeline = Arc::clone(&pipeline);
            async move {
                let outcome = pipeline.diagnose(&label).await;
                (label, outcome)
            }
        })
        .buffer_unordered(config.concurrency)
        .collect()
        .await;

    for (label, outcome) in &outcomes {
        println!("\n{:=<72}", "");
        match outcome {
            Ok(outcome) => {
                let status = if outcome.is_refused() { "REFUSED" } else { "VERIFIED" };
                println!("{status}: {label}");
                println!("{:-<72}", "");
                println!("{}", outcome.message());
                if let Some(eppocode) = outcome.eppocode() {
                    println!("\nEPPO code: {eppocode}");
                }
                if let Some(confidence) = outcome.confidence() {
                    println!("Confidence: {confidence:.2}");
                }
            }
            Err(e) => {
                println!("ERROR: {label}");
                println!("{:-<72}", "");
                println!("{e}");
            }
        }
    }

    let report = stats.report();
    println!("\n{:=<72}", "");
    println!("Summary");
    println!("{:-<72}", "");
    println!("{}", serde_json::to_string_pretty(&report)?);

    let provider_stats = pipeline.fact_provider().stats();
    println!(
        "EPPO cache: {} hits, {} misses, {} API calls",
        provider_stats.cache_hits, provider_stats.cache_misses, provider_stats.api_calls
    );
    println!("LLM calls: {}", pipeline.generator().call_count());

    Ok(())
}
