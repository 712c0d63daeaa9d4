//! Stage artifacts: JSON files written into the workspace and tracked by path
use crate::error::Result;
use crate::workspace::Workspace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const VALIDATION_REPORT: &str = "validation-report.json";
pub const REPAIR_LOG: &str = "repair-log.json";
pub const FILE_TREE: &str = "file-tree.json";
pub const PREVIEW_INFO: &str = "preview-info.json";

/// Root-level files the validator never scans
pub const VALIDATION_METADATA: &[&str] = &[
    "brief.json",
    "provenance.json",
    "plan.json",
    FILE_TREE,
    PREVIEW_INFO,
    VALIDATION_REPORT,
    REPAIR_LOG,
];

/// Root-level files left out of the package manifest
pub const PACKAGE_METADATA: &[&str] = &[
    VALIDATION_REPORT,
    REPAIR_LOG,
    "plan.json",
    "provenance.json",
    FILE_TREE,
    PREVIEW_INFO,
];

/// Hex digits kept from the content digest in manifests
pub const SHORT_HASH_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    #[serde(rename = "type")]
    pub artifact_type: String,
    pub path: String,
    pub size: u64,
    pub content_hash: String,
}

/// Artifacts keyed by relative path
pub type ArtifactMap = BTreeMap<String, Artifact>;

pub fn content_hash(bytes: &[u8]) -> String {
    format!("blake3:{}", blake3::hash(bytes))
}

/// Truncated digest used for change detection in the file tree
pub fn short_hash(bytes: &[u8]) -> String {
    let hex = blake3::hash(bytes).to_hex();
    hex[..SHORT_HASH_LEN].to_string()
}

pub fn is_validation_metadata(rel_path: &str) -> bool {
    VALIDATION_METADATA.contains(&rel_path)
}

pub fn is_package_metadata(rel_path: &str) -> bool {
    PACKAGE_METADATA.contains(&rel_path)
}

/// Serialize `value` as pretty JSON into `name` at the workspace root.
pub async fn write_json_artifact<T: Serialize>(
    workspace: &Workspace,
    name: &str,
    artifact_type: &str,
    value: &T,
) -> Result<Artifact> {
    let bytes = serde_json::to_vec_pretty(value)?;
    workspace.write(name, &bytes).await?;
    tracing::debug!(artifact = name, size = bytes.len(), "wrote artifact");

    Ok(Artifact {
        artifact_type: artifact_type.to_string(),
        path: name.to_string(),
        size: bytes.len() as u64,
        content_hash: content_hash(&bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_short_hash_is_twelve_hex_chars() {
        let hash = short_hash(b"<html></html>");
        assert_eq!(hash.len(), SHORT_HASH_LEN);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, short_hash(b"<html></html>"));
        assert_ne!(hash, short_hash(b"<html> </html>"));
    }

    #[test]
    fn test_brief_is_skipped_by_validation_but_packaged() {
        assert!(is_validation_metadata("brief.json"));
        assert!(!is_package_metadata("brief.json"));
        assert!(is_package_metadata("repair-log.json"));
        assert!(!is_validation_metadata("assets/plan.json"));
    }

    #[tokio::test]
    async fn test_writes_artifact_into_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::open(dir.path()).await.unwrap();

        let artifact = write_json_artifact(&ws, PREVIEW_INFO, "preview-info", &json!({ "routes": ["/"] }))
            .await
            .unwrap();

        let on_disk = std::fs::read(dir.path().join(PREVIEW_INFO)).unwrap();
        assert_eq!(artifact.size, on_disk.len() as u64);
        assert_eq!(artifact.content_hash, content_hash(&on_disk));
        assert_eq!(serde_json::to_value(&artifact).unwrap()["type"], "preview-info");
    }
}
