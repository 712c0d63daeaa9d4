//! SiteGate API /v1: job submission and progress polling
pub mod handlers;
pub mod metrics;
pub mod middleware;

pub use handlers::AppState;

use axum::{
    routing::{get, post},
    Router,
};

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/jobs/{job_id}",
            post(handlers::start_job).delete(handlers::delete_job),
        )
        .route("/v1/jobs/{job_id}/progress", get(handlers::job_progress))
        .route("/v1/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::trace())
        .layer(middleware::cors())
        .with_state(state)
}

pub async fn run(addr: &str, state: AppState) -> anyhow::Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("SiteGate API listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
