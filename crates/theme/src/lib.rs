//! Theme configuration and the active-theme registry.
//!
//! A theme is a template source plus a manifest describing its sections,
//! layout and assets. The registry loads each theme's manifest lazily on
//! first activation, caches the initialized engine state, and tracks
//! which theme is active for the preview session.

use log::{info, warn};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};
use thiserror::Error;
use vitrine_dialect::ThemeRenderer;
use vitrine_model::ThemeManifest;
use vitrine_store::{ParsedTemplateCache, TemplateStore};
use vitrine_traits::TemplateSource;

/// Default logical path of a theme's manifest under its source root.
const MANIFEST_PATH: &str = "manifest.json";

#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("Unknown theme '{0}' and no default is registered")]
    Unknown(String),

    #[error("Theme '{id}' is not ready: {message}")]
    NotReady { id: String, message: String },
}

/// One initialized theme: manifest, stores and the dialect engine bound
/// to them.
#[derive(Debug)]
pub struct ThemeHandle {
    pub manifest: Arc<ThemeManifest>,
    pub store: Arc<TemplateStore>,
    pub parsed: Arc<ParsedTemplateCache>,
    pub renderer: ThemeRenderer,
}

struct RegisteredTheme {
    source: Arc<dyn TemplateSource>,
    manifest_path: String,
}

/// Owns theme configuration and the "active theme" pointer.
pub struct ThemeRegistry {
    themes: RwLock<HashMap<String, RegisteredTheme>>,
    handles: tokio::sync::Mutex<HashMap<String, Arc<ThemeHandle>>>,
    active: RwLock<Option<String>>,
    default_id: String,
    warned: Mutex<HashSet<String>>,
}

impl ThemeRegistry {
    pub fn new(default_id: &str) -> Self {
        Self {
            themes: RwLock::new(HashMap::new()),
            handles: tokio::sync::Mutex::new(HashMap::new()),
            active: RwLock::new(None),
            default_id: default_id.to_string(),
            warned: Mutex::new(HashSet::new()),
        }
    }

    pub fn default_theme_id(&self) -> &str {
        &self.default_id
    }

    /// Registers a theme's template source under the conventional
    /// manifest path.
    pub fn register_source(&self, id: &str, source: Arc<dyn TemplateSource>) {
        self.register_source_with_manifest(id, source, MANIFEST_PATH);
    }

    pub fn register_source_with_manifest(
        &self,
        id: &str,
        source: Arc<dyn TemplateSource>,
        manifest_path: &str,
    ) {
        if let Ok(mut themes) = self.themes.write() {
            themes.insert(
                id.to_string(),
                RegisteredTheme {
                    source,
                    manifest_path: manifest_path.to_string(),
                },
            );
        }
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.themes
            .read()
            .map(|t| t.contains_key(id))
            .unwrap_or(false)
    }

    /// The id of the currently active theme, if any.
    pub fn active_id(&self) -> Option<String> {
        self.active.read().ok().and_then(|a| a.clone())
    }

    /// Activates a theme, initializing it on first use.
    ///
    /// An id with no registered source falls back to the default theme
    /// (warn and continue); a manifest that cannot be fetched or parsed
    /// leaves the theme uninitialized and surfaces [`ThemeError::NotReady`].
    pub async fn activate(&self, id: &str) -> Result<Arc<ThemeHandle>, ThemeError> {
        let resolved = if self.is_registered(id) {
            id.to_string()
        } else {
            if let Ok(mut warned) = self.warned.lock()
                && warned.insert(id.to_string())
            {
                warn!(
                    "[THEME] theme '{id}' is not registered, falling back to '{}'",
                    self.default_id
                );
            }
            if !self.is_registered(&self.default_id) {
                return Err(ThemeError::Unknown(id.to_string()));
            }
            self.default_id.clone()
        };

        let handle = self.handle_for(&resolved).await?;
        if let Ok(mut active) = self.active.write() {
            *active = Some(resolved);
        }
        Ok(handle)
    }

    /// The active theme's handle, if a theme has been activated.
    pub async fn active(&self) -> Option<Arc<ThemeHandle>> {
        let id = self.active_id()?;
        let handles = self.handles.lock().await;
        handles.get(&id).cloned()
    }

    async fn handle_for(&self, id: &str) -> Result<Arc<ThemeHandle>, ThemeError> {
        let mut handles = self.handles.lock().await;
        if let Some(handle) = handles.get(id) {
            return Ok(Arc::clone(handle));
        }

        let (source, manifest_path) = {
            let themes = self.themes.read().map_err(|_| ThemeError::NotReady {
                id: id.to_string(),
                message: "theme table lock poisoned".to_string(),
            })?;
            let theme = themes
                .get(id)
                .ok_or_else(|| ThemeError::Unknown(id.to_string()))?;
            (Arc::clone(&theme.source), theme.manifest_path.clone())
        };

        // Manifest failure is fatal to this theme, not to the process.
        let text = source
            .load(&manifest_path)
            .await
            .map_err(|e| ThemeError::NotReady {
                id: id.to_string(),
                message: e.to_string(),
            })?;
        let manifest: ThemeManifest =
            serde_json::from_str(&text).map_err(|e| ThemeError::NotReady {
                id: id.to_string(),
                message: format!("manifest parse error: {e}"),
            })?;
        if manifest.id != id {
            warn!(
                "[THEME] manifest id '{}' does not match registered id '{id}'",
                manifest.id
            );
        }
        info!(
            "[THEME] initialized '{}' v{} ({} sections)",
            manifest.name,
            manifest.version,
            manifest.sections.len()
        );

        let manifest = Arc::new(manifest);
        let store = Arc::new(TemplateStore::new(source, Arc::clone(&manifest)));
        let parsed = Arc::new(ParsedTemplateCache::new());
        let handle = Arc::new(ThemeHandle {
            manifest,
            renderer: ThemeRenderer::new(Arc::clone(&store), Arc::clone(&parsed)),
            store,
            parsed,
        });
        handles.insert(id.to_string(), Arc::clone(&handle));
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_traits::InMemoryTemplateSource;

    const MANIFEST: &str = r#"{
        "id": "aurora",
        "name": "Aurora",
        "version": "1.0.0",
        "sections": [],
        "layout": {
            "theme": "layout/theme.liquid",
            "header": "sections/header.liquid",
            "footer": "sections/footer.liquid"
        }
    }"#;

    fn registry_with_aurora() -> ThemeRegistry {
        let registry = ThemeRegistry::new("aurora");
        let source = InMemoryTemplateSource::new();
        source.add("manifest.json", MANIFEST);
        registry.register_source("aurora", Arc::new(source));
        registry
    }

    #[tokio::test]
    async fn test_activate_loads_manifest_lazily_once() {
        let registry = registry_with_aurora();
        assert!(registry.active_id().is_none());

        let first = registry.activate("aurora").await.unwrap();
        assert_eq!(first.manifest.name, "Aurora");
        assert_eq!(registry.active_id().as_deref(), Some("aurora"));

        let second = registry.activate("aurora").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_unknown_theme_falls_back_to_default() {
        let registry = registry_with_aurora();
        let handle = registry.activate("mystery").await.unwrap();
        assert_eq!(handle.manifest.id, "aurora");
        assert_eq!(registry.active_id().as_deref(), Some("aurora"));
    }

    #[tokio::test]
    async fn test_missing_manifest_is_not_ready() {
        let registry = ThemeRegistry::new("aurora");
        registry.register_source("aurora", Arc::new(InMemoryTemplateSource::new()));

        let err = registry.activate("aurora").await.unwrap_err();
        assert!(matches!(err, ThemeError::NotReady { .. }));
        // The failure is not cached as a handle.
        assert!(registry.active().await.is_none());
    }

    #[tokio::test]
    async fn test_bad_manifest_json_is_not_ready() {
        let registry = ThemeRegistry::new("aurora");
        let source = InMemoryTemplateSource::new();
        source.add("manifest.json", "{ not json");
        registry.register_source("aurora", Arc::new(source));

        let err = registry.activate("aurora").await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("not ready"));
    }
}
