//! Pipeline Controller: sequences the stages for one job and keeps the
//! stage log, artifact map and progress snapshot.
//!
//! State lives behind an `Arc<RwLock<..>>` so clones of a controller share
//! it. Locks are only taken for bookkeeping and are never held while a
//! stage touches the filesystem, so `progress()` stays responsive while a
//! run is in flight.

use crate::{Packager, Repairer, Validator};
use serde::Serialize;
use serde_json::{json, Value};
use sitegate_core::{
    Artifact, ArtifactMap, PackageResult, PipelineOptions, PipelineStage, RepairSummary, Result,
    SitegateError, StageLog, StageLogEntry, ValidationResult, Workspace,
};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

#[derive(Debug)]
struct ControllerState {
    workspace_path: Option<PathBuf>,
    stage: PipelineStage,
    stage_log: StageLog,
    artifacts: ArtifactMap,
    error: Option<String>,
    latest_validation: Option<ValidationResult>,
}

/// Polling snapshot of a controller
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub job_id: String,
    pub current_stage: PipelineStage,
    pub stages_completed: usize,
    pub total_stages: usize,
    pub progress_percent: u32,
    pub stage_log: Vec<StageLogEntry>,
    pub artifacts: ArtifactMap,
    pub error: Option<String>,
}

/// What a stage body hands back to `execute`
struct StageRun<T> {
    value: T,
    artifacts: Vec<Artifact>,
    extra: Value,
}

#[derive(Debug, Clone)]
pub struct PipelineController {
    job_id: String,
    options: PipelineOptions,
    state: Arc<RwLock<ControllerState>>,
}

impl PipelineController {
    pub fn new(job_id: impl Into<String>, options: PipelineOptions) -> Self {
        Self {
            job_id: job_id.into(),
            options,
            state: Arc::new(RwLock::new(ControllerState {
                workspace_path: None,
                stage: PipelineStage::Pending,
                stage_log: StageLog::new(),
                artifacts: ArtifactMap::new(),
                error: None,
                latest_validation: None,
            })),
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Bind the workspace directory. Can only be done once.
    pub async fn init(&self, workspace_path: impl Into<PathBuf>) -> Result<()> {
        let mut state = self.state.write().await;
        if let Some(existing) = &state.workspace_path {
            return Err(SitegateError::AlreadyInitialized(existing.clone()));
        }
        state.workspace_path = Some(workspace_path.into());
        Ok(())
    }

    pub async fn workspace_path(&self) -> Option<PathBuf> {
        self.state.read().await.workspace_path.clone()
    }

    pub async fn stage(&self) -> PipelineStage {
        self.state.read().await.stage
    }

    pub async fn latest_validation(&self) -> Option<ValidationResult> {
        self.state.read().await.latest_validation.clone()
    }

    /// Run stages in order up to and including `through`.
    pub async fn run(&self, through: PipelineStage) -> Result<Progress> {
        if !through.is_runnable() {
            return Err(SitegateError::Stage {
                stage: through.to_string(),
                message: "not a runnable stage".to_string(),
            });
        }

        let span = info_span!(
            "pipeline",
            job_id = %self.job_id,
            run_id = %Uuid::new_v4(),
            through = %through
        );

        async move {
            self.state.write().await.error = None;
            info!("pipeline run started");

            for stage in PipelineStage::RUNNABLE
                .into_iter()
                .take_while(|stage| *stage <= through)
            {
                match stage {
                    PipelineStage::Init => self.init_stage().await?,
                    PipelineStage::Validate => {
                        self.validate().await?;
                    }
                    PipelineStage::Repair => self.repair_stage().await?,
                    PipelineStage::Package => {
                        self.package().await?;
                    }
                    _ => {}
                }
            }

            let progress = self.progress().await;
            info!(
                stage = %progress.current_stage,
                percent = progress.progress_percent,
                "pipeline run finished"
            );
            Ok(progress)
        }
        .instrument(span)
        .await
    }

    /// Start `run` on the runtime without waiting for it. Observe it with
    /// `progress()` or by awaiting the handle.
    pub fn spawn(&self, through: PipelineStage) -> JoinHandle<Result<Progress>> {
        let controller = self.clone();
        tokio::spawn(async move { controller.run(through).await })
    }

    pub async fn validate(&self) -> Result<ValidationResult> {
        let validator = Validator::from_options(&self.options);
        let result = self
            .execute(PipelineStage::Validate, |ws| async move {
                let output = validator.validate(&ws).await?;
                let extra = json!({
                    "score": output.value.score,
                    "canDeploy": output.value.can_deploy,
                    "violations": output.value.violations.len(),
                    "placeholders": output.value.placeholders.len(),
                });
                Ok::<_, SitegateError>(StageRun {
                    value: output.value,
                    artifacts: output.artifacts,
                    extra,
                })
            })
            .await?;

        self.state.write().await.latest_validation = Some(result.clone());
        Ok(result)
    }

    /// Repair from `result`, then keep repairing while the site is still not
    /// deployable and attempts remain.
    pub async fn repair(&self, result: &ValidationResult) -> Result<RepairSummary> {
        let validator = Validator::from_options(&self.options);
        let max_attempts = self.options.max_repair_attempts;
        let start = result.clone();

        let (summary, validation) = self
            .execute(PipelineStage::Repair, |ws| async move {
                let repairer = Repairer::new(&validator);
                let mut current = start;
                let mut artifacts = Vec::new();
                let mut repaired = 0;
                let mut attempts = 0;

                while attempts < max_attempts {
                    attempts += 1;
                    let output = repairer.repair(&ws, &current, attempts).await?;
                    artifacts.extend(output.artifacts);
                    repaired += output.value.summary.repaired_count;
                    current = output.value.validation;
                    if current.can_deploy {
                        break;
                    }
                }

                let summary = RepairSummary {
                    repaired_count: repaired,
                    remaining_count: current.issue_count(),
                    score: current.score,
                    can_deploy: current.can_deploy,
                };
                Ok::<_, SitegateError>(StageRun {
                    extra: json!({
                        "attempts": attempts,
                        "skipped": false,
                        "repairedCount": summary.repaired_count,
                        "remainingCount": summary.remaining_count,
                    }),
                    value: (summary, current),
                    artifacts,
                })
            })
            .await?;

        self.state.write().await.latest_validation = Some(validation);
        Ok(summary)
    }

    pub async fn package(&self) -> Result<PackageResult> {
        let result = self
            .execute(PipelineStage::Package, |ws| async move {
                let output = Packager::new().package(&ws).await?;
                let extra = json!({
                    "totalFiles": output.value.total_files,
                    "totalSize": output.value.total_size,
                    "entryPoint": output.value.entry_point,
                });
                Ok::<_, SitegateError>(StageRun {
                    value: output.value,
                    artifacts: output.artifacts,
                    extra,
                })
            })
            .await?;

        self.state.write().await.stage = PipelineStage::Completed;
        Ok(result)
    }

    pub async fn progress(&self) -> Progress {
        let state = self.state.read().await;
        let completed = state.stage_log.completed_stages();
        Progress {
            job_id: self.job_id.clone(),
            current_stage: state.stage,
            stages_completed: completed,
            total_stages: PipelineStage::TOTAL_STAGES,
            progress_percent: (completed * 100 / PipelineStage::TOTAL_STAGES) as u32,
            stage_log: state.stage_log.entries().to_vec(),
            artifacts: state.artifacts.clone(),
            error: state.error.clone(),
        }
    }

    async fn init_stage(&self) -> Result<()> {
        self.execute(PipelineStage::Init, |ws| async move {
            Ok::<_, SitegateError>(StageRun {
                value: (),
                artifacts: Vec::new(),
                extra: json!({ "workspace": ws.root().display().to_string() }),
            })
        })
        .await
    }

    async fn repair_stage(&self) -> Result<()> {
        match self.latest_validation().await {
            Some(result) if result.can_deploy => {
                self.execute(PipelineStage::Repair, |_ws| async move {
                    Ok::<_, SitegateError>(StageRun {
                        value: (),
                        artifacts: Vec::new(),
                        extra: json!({ "attempts": 0, "skipped": true }),
                    })
                })
                .await
            }
            Some(result) => self.repair(&result).await.map(|_| ()),
            None => {
                self.execute(PipelineStage::Repair, |_ws| async move {
                    Err::<StageRun<()>, _>(SitegateError::NoValidationResult)
                })
                .await
            }
        }
    }

    /// Log `stage` as running, run `body` against the workspace, then record
    /// artifacts and completion, or the failure.
    async fn execute<T, F, Fut>(&self, stage: PipelineStage, body: F) -> Result<T>
    where
        F: FnOnce(Workspace) -> Fut,
        Fut: Future<Output = Result<StageRun<T>>>,
    {
        let workspace_path = {
            let mut state = self.state.write().await;
            state.stage = stage;
            state.stage_log.begin(stage);
            state.workspace_path.clone()
        };
        info!(stage = %stage, "stage started");
        let started = Instant::now();

        let outcome = match workspace_path {
            Some(path) => match Workspace::open(&path).await {
                Ok(workspace) => body(workspace).await,
                Err(e) => Err(e),
            },
            None => Err(SitegateError::NotInitialized),
        };
        let duration_ms = started.elapsed().as_millis() as u64;

        let mut state = self.state.write().await;
        match outcome {
            Ok(run) => {
                let mut paths: Vec<String> = Vec::new();
                for artifact in run.artifacts {
                    if !paths.contains(&artifact.path) {
                        paths.push(artifact.path.clone());
                    }
                    state.artifacts.insert(artifact.path.clone(), artifact);
                }
                state.stage_log.complete(stage, paths, run.extra);
                info!(stage = %stage, duration_ms, "stage completed");
                Ok(run.value)
            }
            Err(e) => {
                let message = e.to_string();
                warn!(stage = %stage, duration_ms, error = %message, "stage failed");
                state.stage_log.fail(stage, message.clone());
                state.stage = PipelineStage::Failed;
                state.error = Some(message);
                Err(e)
            }
        }
    }
}
