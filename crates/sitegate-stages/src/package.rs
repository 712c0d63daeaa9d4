//! Package stage: file manifest, routes and entry point.

use crate::StageOutput;
use sitegate_core::artifact::{
    is_package_metadata, short_hash, write_json_artifact, FILE_TREE, PREVIEW_INFO,
};
use sitegate_core::workspace::INDEX_FILES;
use sitegate_core::{ManifestEntry, PackageResult, PreviewInfo, Result, SitegateError, Workspace};
use std::collections::BTreeSet;
use tracing::debug;

/// Route served for a markup file: `/` plus its path with a trailing index
/// file name removed.
pub fn route_for(rel_path: &str) -> String {
    let lower = rel_path.to_ascii_lowercase();
    let trimmed = INDEX_FILES
        .iter()
        .find(|index| {
            lower == **index || lower.ends_with(&format!("/{index}"))
        })
        .map(|index| &rel_path[..rel_path.len() - index.len()])
        .unwrap_or(rel_path);
    format!("/{trimmed}")
}

#[derive(Debug, Default)]
pub struct Packager;

impl Packager {
    pub fn new() -> Self {
        Self
    }

    /// Build the manifest without writing anything. Fails as a whole on any
    /// read error.
    pub async fn build(&self, workspace: &Workspace) -> Result<PackageResult> {
        let files = workspace.walk().await?;

        let mut manifest = Vec::new();
        let mut routes = BTreeSet::new();
        let mut entry_point = None;
        let mut total_size = 0u64;

        for file in files.iter().filter(|f| !is_package_metadata(&f.rel_path)) {
            let (size, hash) = if file.is_text() {
                let bytes = tokio::fs::read(&file.abs_path)
                    .await
                    .map_err(|e| SitegateError::io(&file.abs_path, e))?;
                (bytes.len() as u64, Some(short_hash(&bytes)))
            } else {
                (file.size, None)
            };

            if file.is_markup() {
                routes.insert(route_for(&file.rel_path));
                if entry_point.is_none()
                    && INDEX_FILES.iter().any(|i| file.rel_path.eq_ignore_ascii_case(i))
                {
                    entry_point = Some(file.rel_path.clone());
                }
            }

            total_size += size;
            manifest.push(ManifestEntry {
                path: file.rel_path.clone(),
                size,
                hash,
            });
        }

        Ok(PackageResult {
            total_files: manifest.len(),
            manifest,
            routes: routes.into_iter().collect(),
            entry_point,
            total_size,
        })
    }

    /// Build the manifest and write `file-tree.json` and `preview-info.json`.
    pub async fn package(&self, workspace: &Workspace) -> Result<StageOutput<PackageResult>> {
        let result = self.build(workspace).await?;
        debug!(
            files = result.total_files,
            bytes = result.total_size,
            routes = result.routes.len(),
            "package manifest built"
        );

        let file_tree = write_json_artifact(workspace, FILE_TREE, "file-tree", &result).await?;
        let preview = write_json_artifact(
            workspace,
            PREVIEW_INFO,
            "preview-info",
            &PreviewInfo::from(&result),
        )
        .await?;

        Ok(StageOutput {
            value: result,
            artifacts: vec![file_tree, preview],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_routes() {
        assert_eq!(route_for("index.html"), "/");
        assert_eq!(route_for("about.html"), "/about.html");
        assert_eq!(route_for("blog/index.html"), "/blog/");
        assert_eq!(route_for("blog/reindex.html"), "/blog/reindex.html");
        assert_eq!(route_for("docs/INDEX.HTM"), "/docs/");
    }

    #[tokio::test]
    async fn test_manifest_excludes_metadata_and_reports_sizes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<h1>Hi</h1>").unwrap();
        fs::create_dir_all(dir.path().join("blog")).unwrap();
        fs::write(dir.path().join("blog/index.html"), "<p>Posts</p>").unwrap();
        fs::write(dir.path().join("logo.png"), [1u8, 2, 3, 4, 5, 6, 7]).unwrap();
        fs::write(dir.path().join("brief.json"), "{}").unwrap();
        fs::write(dir.path().join("validation-report.json"), "{}").unwrap();
        fs::write(dir.path().join("repair-log.json"), "{}").unwrap();
        fs::write(dir.path().join("plan.json"), "{}").unwrap();
        let ws = Workspace::open(dir.path()).await.unwrap();

        let output = Packager::new().package(&ws).await.unwrap();
        let result = output.value;
        let paths: Vec<_> = result.manifest.iter().map(|e| e.path.as_str()).collect();

        assert_eq!(paths, vec!["blog/index.html", "brief.json", "index.html", "logo.png"]);
        assert_eq!(result.total_files, 4);
        assert_eq!(result.total_size, 12 + 2 + 11 + 7);
        assert_eq!(result.routes, vec!["/", "/blog/"]);
        assert_eq!(result.entry_point.as_deref(), Some("index.html"));

        let logo = result.manifest.iter().find(|e| e.path == "logo.png").unwrap();
        assert_eq!(logo.size, 7);
        assert!(logo.hash.is_none());
        let index = result.manifest.iter().find(|e| e.path == "index.html").unwrap();
        assert_eq!(index.hash.as_deref().map(str::len), Some(12));

        assert!(dir.path().join(FILE_TREE).exists());
        let preview: PreviewInfo =
            serde_json::from_slice(&fs::read(dir.path().join(PREVIEW_INFO)).unwrap()).unwrap();
        assert_eq!(preview.routes, result.routes);
    }

    #[tokio::test]
    async fn test_repackaging_ignores_previous_manifest() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("about.html"), "<p>About</p>").unwrap();
        let ws = Workspace::open(dir.path()).await.unwrap();

        let first = Packager::new().package(&ws).await.unwrap().value;
        let second = Packager::new().package(&ws).await.unwrap().value;

        assert_eq!(first, second);
        assert_eq!(second.entry_point, None);
        assert_eq!(second.total_files, 1);
    }
}
