//! Register types the dialect stores in the render context.
//!
//! The generic engine's registers are type-keyed; these are the types the
//! storefront tags read and rebind while rendering.

use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use vitrine_liquid::{LiquidError, Parser, Template};
use vitrine_model::{LiquidSection, SectionBlock};
use vitrine_store::{ParsedTemplateCache, TemplateStore};

/// The engine handles every dialect tag needs: the theme's raw-text store
/// and its parsed-template cache.
#[derive(Debug)]
pub struct DialectState {
    pub store: Arc<TemplateStore>,
    pub parsed: Arc<ParsedTemplateCache>,
}

impl DialectState {
    pub fn new(store: Arc<TemplateStore>, parsed: Arc<ParsedTemplateCache>) -> Self {
        Self { store, parsed }
    }

    /// Loads and parses a template, going through the parsed cache first.
    /// `key` is the logical render identity; `path` the store path.
    pub async fn load_template(
        &self,
        key: &str,
        path: &str,
        parser: &Parser,
    ) -> Result<Arc<Template>, LiquidError> {
        if let Some(template) = self.parsed.get(key) {
            return Ok(template);
        }

        debug!("[DIALECT] parsing '{key}' from '{path}'");
        let text = self
            .store
            .load_template(path)
            .await
            .map_err(|e| LiquidError::Include {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        let template = Arc::new(parser.parse(&crate::preprocess::preprocess(&text))?);
        self.parsed.set(key, Arc::clone(&template));
        Ok(template)
    }
}

/// The section currently bound as `section`, kept in typed form so
/// `content_for` can walk its block collection without reparsing JSON.
#[derive(Debug, Clone)]
pub struct ActiveSection(pub Arc<LiquidSection>);

/// The block currently bound as `block` inside `content_for` rendering.
#[derive(Debug, Clone)]
pub struct ActiveBlock(pub Arc<SectionBlock>);

/// The context's `sections` map, consulted by `{% section %}` and
/// `{% sections %}` when a named section carries editor data.
#[derive(Debug, Default, Clone)]
pub struct SectionsData(pub HashMap<String, Arc<LiquidSection>>);

impl SectionsData {
    /// Finds the first entry matching any of the candidate names.
    pub fn first_match(&self, candidates: &[&str]) -> Option<Arc<LiquidSection>> {
        candidates
            .iter()
            .find_map(|name| self.0.get(*name).cloned())
    }
}
