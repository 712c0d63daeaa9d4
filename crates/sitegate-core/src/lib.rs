//! SiteGate Core: data model, stage log, workspace and artifacts
//!
//! Shared types for the validate → repair → package pipeline that turns a
//! directory of generated site files into a deployable bundle.

pub mod artifact;
pub mod context;
pub mod data_model;
pub mod error;
pub mod stage;
pub mod workspace;

pub use artifact::{Artifact, ArtifactMap};
pub use context::PipelineOptions;
pub use data_model::{
    Completeness, ManifestEntry, PackageResult, Placeholder, PreviewInfo, RepairLog,
    RepairLogEntry, RepairSummary, ValidationResult, Violation, ViolationCategory,
};
pub use error::{Result, SitegateError};
pub use stage::{PipelineStage, StageLog, StageLogEntry, StageStatus};
pub use workspace::{Workspace, WorkspaceFile};

/// SiteGate engine version
pub const SITEGATE_VERSION: &str = "1.0.0";
