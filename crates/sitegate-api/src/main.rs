//! Binary entrypoint for the SiteGate API server.
use anyhow::Context;
use sitegate_api::{run, AppState};
use sitegate_core::PipelineOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // Default listen address can be overridden with SITEGATE_ADDR
    let addr = std::env::var("SITEGATE_ADDR").unwrap_or_else(|_| "0.0.0.0:8787".to_string());

    let options = match std::env::var("SITEGATE_OPTIONS") {
        Ok(path) => {
            let yaml = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("reading options file {}", path))?;
            PipelineOptions::from_yaml(&yaml)?
        }
        Err(_) => PipelineOptions::default(),
    };
    tracing::info!(
        expected_pages = options.expected_pages.len(),
        approved_claims = options.approved_claims.len(),
        max_repair_attempts = options.max_repair_attempts,
        "default pipeline options loaded"
    );

    let state = AppState::new(options).context("building metrics registry")?;
    run(&addr, state).await
}
