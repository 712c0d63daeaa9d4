//! Unified Error Model
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SitegateError>;

#[derive(Error, Debug)]
pub enum SitegateError {
    #[error("IO/{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("WORKSPACE/not found: {0}")]
    WorkspaceNotFound(PathBuf),

    #[error("WORKSPACE/path escapes workspace root: {0}")]
    PathEscapesWorkspace(String),

    #[error("STATE/workspace path not initialized")]
    NotInitialized,

    #[error("STATE/workspace path already initialized: {0}")]
    AlreadyInitialized(PathBuf),

    #[error("STATE/no validation result to repair")]
    NoValidationResult,

    #[error("SERIALIZE/{0}")]
    Serialize(#[from] serde_json::Error),

    #[error("CONFIG/{0}")]
    Config(String),

    #[error("STAGE/{stage}: {message}")]
    Stage { stage: String, message: String },
}

impl SitegateError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
