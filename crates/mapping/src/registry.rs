//! The mapper registry with its designated fallback.

use crate::mapper::SectionMapper;
use crate::{AuroraMapper, PrismaMapper};
use log::warn;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Resolves theme ids to mapper strategies.
///
/// Unknown ids resolve to the fallback mapper — never an error — with one
/// warning per distinct id. Repeated lookups of the same id return the
/// identical mapper object.
pub struct MapperRegistry {
    mappers: HashMap<String, Arc<dyn SectionMapper>>,
    fallback: Arc<dyn SectionMapper>,
    warned: Mutex<HashSet<String>>,
}

impl MapperRegistry {
    /// Creates a registry with the given fallback already registered.
    pub fn new(fallback: Arc<dyn SectionMapper>) -> Self {
        let mut mappers: HashMap<String, Arc<dyn SectionMapper>> = HashMap::new();
        mappers.insert(fallback.theme_id().to_string(), Arc::clone(&fallback));
        Self {
            mappers,
            fallback,
            warned: Mutex::new(HashSet::new()),
        }
    }

    /// The registry the bundled themes ship with: Aurora (fallback) and
    /// Prisma.
    pub fn with_bundled_themes() -> Self {
        let mut registry = Self::new(Arc::new(AuroraMapper));
        registry.register(Arc::new(PrismaMapper));
        registry
    }

    /// Registers a mapper under its own theme id.
    pub fn register(&mut self, mapper: Arc<dyn SectionMapper>) {
        self.mappers.insert(mapper.theme_id().to_string(), mapper);
    }

    /// The fallback's theme id.
    pub fn default_theme_id(&self) -> &str {
        self.fallback.theme_id()
    }

    /// Resolves a theme id, falling back for unknown ids.
    pub fn resolve(&self, theme_id: &str) -> Arc<dyn SectionMapper> {
        if let Some(mapper) = self.mappers.get(theme_id) {
            return Arc::clone(mapper);
        }
        if let Ok(mut warned) = self.warned.lock()
            && warned.insert(theme_id.to_string())
        {
            warn!(
                "[MAPPING] no mapper for theme '{theme_id}', using '{}'",
                self.fallback.theme_id()
            );
        }
        Arc::clone(&self.fallback)
    }
}
