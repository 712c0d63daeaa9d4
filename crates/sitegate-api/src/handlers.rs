//! API Handlers
use crate::metrics::{PipelineMetrics, RunOutcome};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sitegate_core::{PipelineOptions, PipelineStage, SitegateError, SITEGATE_VERSION};
use sitegate_stages::{PipelineController, PipelineRegistry, Progress};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<PipelineRegistry>,
    pub metrics: Arc<PipelineMetrics>,
    /// Used when a job request carries no options of its own
    pub default_options: PipelineOptions,
}

impl AppState {
    pub fn new(default_options: PipelineOptions) -> Result<Self, prometheus::Error> {
        Ok(Self {
            registry: Arc::new(PipelineRegistry::new()),
            metrics: Arc::new(PipelineMetrics::new()?),
            default_options,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartJobRequest {
    pub workspace_path: PathBuf,
    #[serde(default)]
    pub through_stage: Option<PipelineStage>,
    #[serde(default)]
    pub options: Option<PipelineOptions>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn job_not_found(job_id: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("job '{}' not found", job_id))
    }
}

impl From<SitegateError> for ApiError {
    fn from(e: SitegateError) -> Self {
        let status = match &e {
            SitegateError::WorkspaceNotFound(_)
            | SitegateError::PathEscapesWorkspace(_)
            | SitegateError::Config(_) => StatusCode::BAD_REQUEST,
            SitegateError::AlreadyInitialized(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// POST /v1/jobs/{job_id}
pub async fn start_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(req): Json<StartJobRequest>,
) -> Result<(StatusCode, Json<Progress>), ApiError> {
    let through = req.through_stage.unwrap_or(PipelineStage::Package);
    if !through.is_runnable() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            format!("'{}' is not a runnable stage", through),
        ));
    }

    let options = req.options.unwrap_or_else(|| state.default_options.clone());
    let controller = PipelineController::new(job_id.clone(), options);
    controller.init(req.workspace_path).await?;

    if !state.registry.register(controller.clone()).await {
        return Err(ApiError::new(
            StatusCode::CONFLICT,
            format!("job '{}' already exists", job_id),
        ));
    }

    state.metrics.record(RunOutcome::Started);
    info!(job_id = %job_id, through = %through, "job accepted");

    let handle = controller.spawn(through);
    let metrics = state.metrics.clone();
    let watched = job_id.clone();
    tokio::spawn(async move {
        match handle.await {
            Ok(Ok(_)) => metrics.record(RunOutcome::Completed),
            Ok(Err(e)) => {
                warn!(job_id = %watched, error = %e, "job failed");
                metrics.record(RunOutcome::Failed);
            }
            Err(e) => {
                error!(job_id = %watched, error = %e, "job task aborted");
                metrics.record(RunOutcome::Failed);
            }
        }
    });

    Ok((StatusCode::ACCEPTED, Json(controller.progress().await)))
}

/// GET /v1/jobs/{job_id}/progress
pub async fn job_progress(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Progress>, ApiError> {
    let controller = state
        .registry
        .get(&job_id)
        .await
        .ok_or_else(|| ApiError::job_not_found(&job_id))?;
    Ok(Json(controller.progress().await))
}

/// DELETE /v1/jobs/{job_id}
pub async fn delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.registry.delete(&job_id).await {
        info!(job_id = %job_id, "job removed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::job_not_found(&job_id))
    }
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "version": SITEGATE_VERSION,
            "jobs": state.registry.len().await,
        })),
    )
}

pub async fn metrics(State(state): State<AppState>) -> Result<Response, ApiError> {
    let body = state
        .metrics
        .encode()
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response())
}
