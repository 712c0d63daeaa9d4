//! Stage lifecycle and the per-stage execution log
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Controller state. `Init..=Package` are the runnable stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Pending,
    Init,
    Validate,
    Repair,
    Package,
    Completed,
    Failed,
}

impl PipelineStage {
    /// Runnable stages in execution order
    pub const RUNNABLE: [PipelineStage; 4] = [
        PipelineStage::Init,
        PipelineStage::Validate,
        PipelineStage::Repair,
        PipelineStage::Package,
    ];

    pub const TOTAL_STAGES: usize = Self::RUNNABLE.len();

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Init => "init",
            Self::Validate => "validate",
            Self::Repair => "repair",
            Self::Package => "package",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn is_runnable(&self) -> bool {
        Self::RUNNABLE.contains(self)
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "init" => Some(Self::Init),
            "validate" => Some(Self::Validate),
            "repair" => Some(Self::Repair),
            "package" => Some(Self::Package),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageLogEntry {
    pub stage: PipelineStage,
    pub status: StageStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_ms: Option<u64>,
    /// Relative paths of artifacts written by this stage
    pub produced_artifacts: Vec<String>,
    pub errors: Vec<String>,
    #[serde(default)]
    pub extra: Value,
}

impl StageLogEntry {
    fn running(stage: PipelineStage) -> Self {
        Self {
            stage,
            status: StageStatus::Running,
            started_at: Utc::now(),
            completed_at: None,
            duration_ms: None,
            produced_artifacts: Vec::new(),
            errors: Vec::new(),
            extra: Value::Null,
        }
    }

    fn finish(&mut self, status: StageStatus) {
        let now = Utc::now();
        let elapsed = (now - self.started_at).num_milliseconds().max(0) as u64;
        self.status = status;
        self.completed_at = Some(now);
        self.duration_ms = Some(elapsed);
    }
}

/// Ordered stage history for one controller.
///
/// At most one non-completed entry exists per stage: `begin` drops any
/// running or failed entry left over for the same stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageLog {
    entries: Vec<StageLogEntry>,
}

impl StageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, stage: PipelineStage) {
        self.entries
            .retain(|e| e.stage != stage || e.status == StageStatus::Completed);
        self.entries.push(StageLogEntry::running(stage));
    }

    pub fn complete(&mut self, stage: PipelineStage, artifacts: Vec<String>, extra: Value) {
        if let Some(entry) = self.open_entry(stage) {
            entry.produced_artifacts = artifacts;
            entry.extra = extra;
            entry.finish(StageStatus::Completed);
        }
    }

    pub fn fail(&mut self, stage: PipelineStage, message: impl Into<String>) {
        if let Some(entry) = self.open_entry(stage) {
            entry.errors.push(message.into());
            entry.finish(StageStatus::Failed);
        }
    }

    /// Number of distinct stages with a completed entry
    pub fn completed_stages(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.status == StageStatus::Completed)
            .map(|e| e.stage)
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn entries(&self) -> &[StageLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn open_entry(&mut self, stage: PipelineStage) -> Option<&mut StageLogEntry> {
        self.entries
            .iter_mut()
            .rev()
            .find(|e| e.stage == stage && e.status == StageStatus::Running)
    }
}
