//! The raw-text template store.

use log::{debug, warn};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use vitrine_model::ThemeManifest;
use vitrine_traits::{SharedTemplateText, SourceError, TemplateSource};

/// Error type for store operations.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("Failed to load '{path}': {source}")]
    Load {
        path: String,
        #[source]
        source: SourceError,
    },
}

impl StoreError {
    pub fn load(path: &str, source: SourceError) -> Self {
        StoreError::Load {
            path: path.to_string(),
            source,
        }
    }

    /// The logical path that failed.
    pub fn path(&self) -> &str {
        match self {
            StoreError::Load { path, .. } => path,
        }
    }
}

/// Fetches and caches raw template and CSS text for one theme.
///
/// Every fetch result is cached by exact path; repeated calls return the
/// cached text without touching the source again. Entries are written
/// whole after a completed fetch, so readers never observe partial text.
#[derive(Debug)]
pub struct TemplateStore {
    source: Arc<dyn TemplateSource>,
    manifest: Arc<ThemeManifest>,
    texts: RwLock<HashMap<String, SharedTemplateText>>,
    combined_css: RwLock<Option<SharedTemplateText>>,
}

impl TemplateStore {
    pub fn new(source: Arc<dyn TemplateSource>, manifest: Arc<ThemeManifest>) -> Self {
        Self {
            source,
            manifest,
            texts: RwLock::new(HashMap::new()),
            combined_css: RwLock::new(None),
        }
    }

    pub fn manifest(&self) -> &Arc<ThemeManifest> {
        &self.manifest
    }

    /// Loads a template by logical path, from cache when possible.
    pub async fn load_template(&self, path: &str) -> Result<SharedTemplateText, StoreError> {
        self.load_cached(path).await
    }

    /// Loads a CSS asset by logical path, from cache when possible.
    pub async fn load_css(&self, path: &str) -> Result<SharedTemplateText, StoreError> {
        self.load_cached(path).await
    }

    /// Checks whether an asset exists without caching anything.
    pub async fn exists(&self, path: &str) -> bool {
        if let Ok(texts) = self.texts.read()
            && texts.contains_key(path)
        {
            return true;
        }
        self.source.exists(path).await
    }

    /// Returns the concatenation of the manifest's global CSS plus every
    /// section's optional CSS file, fetching each file at most once. The
    /// combined text is retained for later calls.
    pub async fn load_all_css(&self) -> Result<SharedTemplateText, StoreError> {
        if let Ok(cache) = self.combined_css.read()
            && let Some(combined) = cache.as_ref()
        {
            return Ok(Arc::clone(combined));
        }

        let mut paths: Vec<String> = self.manifest.css.clone();
        for section in &self.manifest.sections {
            if let Some(css) = &section.css
                && !paths.contains(css)
            {
                paths.push(css.clone());
            }
        }

        let mut combined = String::new();
        for path in &paths {
            match self.load_css(path).await {
                Ok(text) => {
                    if !combined.is_empty() {
                        combined.push('\n');
                    }
                    combined.push_str(&text);
                }
                // One bad stylesheet degrades the look, not the page.
                Err(e) => warn!("[STORE] skipping css '{path}': {e}"),
            }
        }

        let shared: SharedTemplateText = Arc::from(combined.as_str());
        if let Ok(mut cache) = self.combined_css.write() {
            *cache = Some(Arc::clone(&shared));
        }
        Ok(shared)
    }

    async fn load_cached(&self, path: &str) -> Result<SharedTemplateText, StoreError> {
        if let Ok(texts) = self.texts.read()
            && let Some(text) = texts.get(path)
        {
            return Ok(Arc::clone(text));
        }

        debug!("[STORE] fetching '{path}' via {}", self.source.name());
        let text = self
            .source
            .load(path)
            .await
            .map_err(|e| StoreError::load(path, e))?;

        if let Ok(mut texts) = self.texts.write() {
            texts.insert(path.to_string(), Arc::clone(&text));
        }
        Ok(text)
    }
}
