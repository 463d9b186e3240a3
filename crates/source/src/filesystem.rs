//! Filesystem-based template source for native platforms.
//!
//! Loads theme assets from a local directory, with checks that resolved
//! paths stay inside the theme root (a logical path comes from a theme
//! manifest, which is still remote input).

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use vitrine_traits::{SharedTemplateText, SourceError, TemplateSource};

/// A template source that reads assets from a directory on disk.
///
/// Logical paths resolve relative to the theme root. Absolute paths and
/// paths containing `..` components are rejected.
#[derive(Debug)]
pub struct FilesystemTemplateSource {
    base_path: PathBuf,
    canonical_base: Option<PathBuf>,
}

impl FilesystemTemplateSource {
    /// Creates a new filesystem source rooted at the given directory.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base = base_path.as_ref().to_path_buf();
        let canonical = base.canonicalize().ok();
        Self {
            base_path: base,
            canonical_base: canonical,
        }
    }

    /// Returns the theme root for this source.
    pub fn base(&self) -> &Path {
        &self.base_path
    }

    /// Resolves a logical path, rejecting anything that would escape the
    /// theme root.
    fn resolve_path_safe(&self, path: &str) -> Option<PathBuf> {
        if Path::new(path).is_absolute() {
            return None;
        }

        let full_path = self.base_path.join(path);

        if let Ok(canonical) = full_path.canonicalize()
            && let Some(ref base) = self.canonical_base
        {
            if canonical.starts_with(base) {
                return Some(canonical);
            }
            return None;
        }

        // Canonicalization fails for missing files; fall back to a
        // component check so obvious traversal is still rejected.
        for component in Path::new(path).components() {
            if let std::path::Component::ParentDir = component {
                return None;
            }
        }

        Some(full_path)
    }
}

#[async_trait]
impl TemplateSource for FilesystemTemplateSource {
    async fn load(&self, path: &str) -> Result<SharedTemplateText, SourceError> {
        let full_path = self
            .resolve_path_safe(path)
            .ok_or_else(|| SourceError::NotFound(format!("{path} (path traversal blocked)")))?;

        tokio::fs::read_to_string(&full_path)
            .await
            .map(|text| Arc::from(text.as_str()))
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SourceError::NotFound(path.to_string())
                } else {
                    SourceError::LoadFailed {
                        path: path.to_string(),
                        message: e.to_string(),
                    }
                }
            })
    }

    async fn exists(&self, path: &str) -> bool {
        match self.resolve_path_safe(path) {
            Some(p) => tokio::fs::try_exists(&p).await.unwrap_or(false),
            None => false,
        }
    }

    fn name(&self) -> &'static str {
        "FilesystemTemplateSource"
    }
}
