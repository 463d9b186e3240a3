//! # vitrine
//!
//! A client-side storefront preview engine: a Liquid-dialect template
//! renderer over a mock commerce object graph, with per-theme section
//! mapping and debounced render scheduling.
//!
//! The workspace splits into focused crates; this crate is the
//! integration layer:
//!
//! - **`vitrine-liquid`**: the generic Liquid-style evaluator
//! - **`vitrine-dialect`**: storefront tags and filters layered on it
//! - **`vitrine-store`**: raw-text and parsed-template caches
//! - **`vitrine-catalog`**: the mock shop/product/collection graph
//! - **`vitrine-mapping`**: per-theme section mapping strategies
//! - **`vitrine-theme`**: manifests and the active-theme registry
//! - **`vitrine-preview`**: the render orchestrator
//!
//! ## Quick start
//!
//! ```ignore
//! use vitrine::{PreviewBuilder, PreviewEvent, PreviewState, UpdateKind};
//!
//! let preview = PreviewBuilder::new().build();
//! preview.orchestrator.set_state(PreviewState {
//!     shop_name: "Acme Outfitters".into(),
//!     theme_id: "aurora".into(),
//!     ..Default::default()
//! });
//! preview.orchestrator.render_now().await;
//! if let Ok(PreviewEvent::Frame(frame)) = preview.events.recv().await {
//!     // hand frame.html / frame.css to the display surface
//! }
//! ```

pub mod bundled;

// Re-export foundation crates
pub use vitrine_catalog as catalog;
pub use vitrine_dialect as dialect;
pub use vitrine_liquid as liquid;
pub use vitrine_mapping as mapping;
pub use vitrine_model as model;
pub use vitrine_store as store;
pub use vitrine_theme as theme;
pub use vitrine_traits as traits;

// Re-export the working surface
pub use vitrine_mapping::{MapperRegistry, SectionMapper, SectionPurpose};
pub use vitrine_model::{
    EditableProduct, EditorContent, EditorItem, EditorSection, EditorSectionKind, HeroContent,
    PageKind, PageState, StyleSettings,
};
pub use vitrine_preview::{
    OrchestratorConfig, PreviewError, PreviewEvent, PreviewFrame, PreviewState, RenderOrchestrator,
    UpdateKind,
};
pub use vitrine_theme::{ThemeError, ThemeHandle, ThemeRegistry};
pub use vitrine_traits::{InMemoryTemplateSource, TemplateSource};

use std::sync::Arc;
use std::time::Duration;

/// A wired-up preview session: orchestrator, its event stream, and the
/// registries behind them.
pub struct Preview {
    pub orchestrator: RenderOrchestrator,
    pub events: async_channel::Receiver<PreviewEvent>,
    pub themes: Arc<ThemeRegistry>,
    pub mappers: Arc<MapperRegistry>,
}

/// Builds a preview session over the bundled themes.
pub struct PreviewBuilder {
    config: OrchestratorConfig,
    initial_state: Option<PreviewState>,
}

impl PreviewBuilder {
    pub fn new() -> Self {
        Self {
            config: OrchestratorConfig::default(),
            initial_state: None,
        }
    }

    /// Overrides the content-update debounce window.
    pub fn debounce_window(mut self, window: Duration) -> Self {
        self.config.debounce_window = window;
        self
    }

    /// Seeds the orchestrator state without scheduling a render.
    pub fn initial_state(mut self, state: PreviewState) -> Self {
        self.initial_state = Some(state);
        self
    }

    pub fn build(self) -> Preview {
        let themes = Arc::new(bundled::theme_registry());
        let mappers = Arc::new(MapperRegistry::with_bundled_themes());
        let (orchestrator, events) =
            RenderOrchestrator::new(Arc::clone(&themes), Arc::clone(&mappers), self.config);
        if let Some(state) = self.initial_state {
            orchestrator.set_state(state);
        }
        Preview {
            orchestrator,
            events,
            themes,
            mappers,
        }
    }
}

impl Default for PreviewBuilder {
    fn default() -> Self {
        Self::new()
    }
}
