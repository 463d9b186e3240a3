//! TemplateSource trait for abstracting template text loading.
//!
//! This trait allows the engine to fetch templates, manifests and CSS
//! without being tied to a transport. In the browser the implementation is
//! an HTTP fetch; in tests it is an in-memory map.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Error type for template loading operations.
#[derive(Error, Debug, Clone)]
pub enum SourceError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Failed to load template '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        SourceError::Io(err.to_string())
    }
}

/// Shared template text (reference-counted string).
pub type SharedTemplateText = Arc<str>;

/// A source of template, manifest and CSS text, addressed by logical path
/// under a theme root.
///
/// Loads are asynchronous because the production source is a network
/// fetch; the engine awaits them at well-defined suspension points.
#[async_trait]
pub trait TemplateSource: Send + Sync + Debug {
    /// Load a text asset by its logical path.
    async fn load(&self, path: &str) -> Result<SharedTemplateText, SourceError>;

    /// Check whether an asset exists without loading it.
    async fn exists(&self, path: &str) -> bool;

    /// Returns a human-readable name for this source (for logging).
    fn name(&self) -> &'static str;
}

/// An in-memory template source.
///
/// Assets are stored in memory and must be pre-populated before use. This
/// is the simplest source and backs both the bundled themes and the test
/// suites.
#[derive(Debug, Default)]
pub struct InMemoryTemplateSource {
    assets: RwLock<HashMap<String, SharedTemplateText>>,
}

impl InMemoryTemplateSource {
    pub fn new() -> Self {
        Self {
            assets: RwLock::new(HashMap::new()),
        }
    }

    /// Add an asset under a logical path.
    pub fn add(&self, path: impl Into<String>, text: impl Into<String>) {
        let text: String = text.into();
        if let Ok(mut assets) = self.assets.write() {
            assets.insert(path.into(), Arc::from(text.as_str()));
        }
    }

    /// Remove an asset. Returns the removed text, if any.
    pub fn remove(&self, path: &str) -> Option<SharedTemplateText> {
        self.assets.write().ok()?.remove(path)
    }

    /// Number of stored assets.
    pub fn len(&self) -> usize {
        self.assets.read().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TemplateSource for InMemoryTemplateSource {
    async fn load(&self, path: &str) -> Result<SharedTemplateText, SourceError> {
        let assets = self.assets.read().map_err(|_| SourceError::LoadFailed {
            path: path.to_string(),
            message: "asset store lock poisoned".to_string(),
        })?;
        assets
            .get(path)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(path.to_string()))
    }

    async fn exists(&self, path: &str) -> bool {
        self.assets
            .read()
            .map(|a| a.contains_key(path))
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "InMemoryTemplateSource"
    }
}
