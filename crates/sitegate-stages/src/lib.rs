//! SiteGate Stages: the validate → repair → package pipeline.
//!
//! # Pipeline Flow
//!
//! ```text
//! Workspace → init → validate ──(not deployable)──→ repair ⟲ → package → completed
//!                       │                               ↑
//!                       └──────────(deployable)─────────┘ (repair skipped)
//! ```
//!
//! Every stage reads and writes inside a single job workspace. Stage
//! metadata lands next to the site files as `validation-report.json`,
//! `repair-log.json`, `file-tree.json` and `preview-info.json`.

pub mod controller;
pub mod package;
pub mod registry;
pub mod repair;
pub mod validate;

pub use controller::{PipelineController, Progress};
pub use package::{route_for, Packager};
pub use registry::PipelineRegistry;
pub use repair::{replacement_for, RepairOutcome, Repairer};
pub use validate::Validator;

use sitegate_core::Artifact;

// ============================================================================
// STAGE OUTPUT
// ============================================================================

/// A stage's value plus the artifacts it wrote into the workspace
#[derive(Debug, Clone)]
pub struct StageOutput<T> {
    pub value: T,
    pub artifacts: Vec<Artifact>,
}

impl<T> StageOutput<T> {
    pub fn artifact_paths(&self) -> Vec<String> {
        self.artifacts.iter().map(|a| a.path.clone()).collect()
    }
}
