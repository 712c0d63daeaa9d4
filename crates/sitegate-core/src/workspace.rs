//! Workspace access: confined path resolution and recursive listing
use crate::error::{Result, SitegateError};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Extensions whose contents are scanned and hashed
pub const TEXT_EXTENSIONS: &[&str] = &[
    "html", "htm", "css", "js", "mjs", "cjs", "jsx", "ts", "tsx", "json", "md", "markdown",
    "txt", "svg",
];

pub const MARKUP_EXTENSIONS: &[&str] = &["html", "htm"];

/// Root-level index files, in preference order
pub const INDEX_FILES: &[&str] = &["index.html", "index.htm"];

/// A regular file found under the workspace root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceFile {
    /// Relative path, `/`-separated
    pub rel_path: String,
    pub abs_path: PathBuf,
    pub size: u64,
}

impl WorkspaceFile {
    pub fn is_text(&self) -> bool {
        is_text_file(&self.rel_path)
    }

    pub fn is_markup(&self) -> bool {
        is_markup_file(&self.rel_path)
    }

    pub fn file_name(&self) -> &str {
        self.rel_path.rsplit('/').next().unwrap_or(&self.rel_path)
    }

    /// True when the file sits directly under the workspace root
    pub fn at_root(&self) -> bool {
        !self.rel_path.contains('/')
    }
}

/// A job's workspace directory. Every path handed out resolves inside `root`.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Open an existing workspace directory
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::metadata(path).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(SitegateError::WorkspaceNotFound(path.to_path_buf())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SitegateError::WorkspaceNotFound(path.to_path_buf()))
            }
            Err(e) => return Err(SitegateError::io(path, e)),
        }
        let root = fs::canonicalize(path)
            .await
            .map_err(|e| SitegateError::io(path, e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join a relative path onto the root, rejecting anything that could
    /// leave it (absolute paths, `..`, drive prefixes).
    pub fn resolve(&self, rel: &str) -> Result<PathBuf> {
        let rel_path = Path::new(rel);
        if rel.is_empty() {
            return Err(SitegateError::PathEscapesWorkspace(rel.to_string()));
        }
        for component in rel_path.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(SitegateError::PathEscapesWorkspace(rel.to_string()))
                }
            }
        }
        Ok(self.root.join(rel_path))
    }

    /// `resolve`, then follow symlinks on the way down: the deepest existing
    /// ancestor must canonicalize under the root. A dangling symlink is
    /// refused since writing through it would create its target.
    pub async fn resolve_confined(&self, rel: &str) -> Result<PathBuf> {
        let path = self.resolve(rel)?;
        let mut existing = path.as_path();

        loop {
            match fs::canonicalize(existing).await {
                Ok(real) if real.starts_with(&self.root) => return Ok(path),
                Ok(_) => return Err(SitegateError::PathEscapesWorkspace(rel.to_string())),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    if fs::symlink_metadata(existing).await.is_ok() {
                        return Err(SitegateError::PathEscapesWorkspace(rel.to_string()));
                    }
                    existing = existing
                        .parent()
                        .ok_or_else(|| SitegateError::PathEscapesWorkspace(rel.to_string()))?;
                }
                Err(e) => return Err(SitegateError::io(existing, e)),
            }
        }
    }

    /// All regular files under the root, sorted by relative path.
    /// Symlinks are not followed.
    pub async fn walk(&self) -> Result<Vec<WorkspaceFile>> {
        if fs::metadata(&self.root).await.is_err() {
            return Err(SitegateError::WorkspaceNotFound(self.root.clone()));
        }
        self.walk_from(self.root.clone()).await
    }

    /// Files under the subdirectory `rel`. A missing subdirectory lists as
    /// empty.
    pub async fn walk_dir(&self, rel: &str) -> Result<Vec<WorkspaceFile>> {
        let dir = self.resolve_confined(rel).await?;
        self.walk_from(dir).await
    }

    async fn walk_from(&self, start: PathBuf) -> Result<Vec<WorkspaceFile>> {
        let mut files = Vec::new();
        let mut pending = vec![start];

        while let Some(dir) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                // Sub-paths may vanish or not exist yet
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(SitegateError::io(&dir, e)),
            };

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| SitegateError::io(&dir, e))?
            {
                let path = entry.path();
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| SitegateError::io(&path, e))?;

                if file_type.is_dir() {
                    pending.push(path);
                } else if file_type.is_file() {
                    let size = entry
                        .metadata()
                        .await
                        .map_err(|e| SitegateError::io(&path, e))?
                        .len();
                    files.push(WorkspaceFile {
                        rel_path: self.relative(&path),
                        abs_path: path,
                        size,
                    });
                }
            }
        }

        files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
        Ok(files)
    }

    pub async fn read(&self, rel: &str) -> Result<Vec<u8>> {
        let path = self.resolve_confined(rel).await?;
        fs::read(&path).await.map_err(|e| SitegateError::io(path, e))
    }

    pub async fn read_to_string(&self, rel: &str) -> Result<String> {
        let path = self.resolve_confined(rel).await?;
        fs::read_to_string(&path)
            .await
            .map_err(|e| SitegateError::io(path, e))
    }

    pub async fn write(&self, rel: &str, contents: impl AsRef<[u8]>) -> Result<()> {
        let path = self.resolve_confined(rel).await?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| SitegateError::io(parent, e))?;
        }
        fs::write(&path, contents)
            .await
            .map_err(|e| SitegateError::io(path, e))
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn extension(rel: &str) -> Option<String> {
    Path::new(rel)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

pub fn is_text_file(rel: &str) -> bool {
    extension(rel).is_some_and(|ext| TEXT_EXTENSIONS.contains(&ext.as_str()))
}

pub fn is_markup_file(rel: &str) -> bool {
    extension(rel).is_some_and(|ext| MARKUP_EXTENSIONS.contains(&ext.as_str()))
}
