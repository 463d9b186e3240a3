//! The parsed-template cache.

use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use vitrine_liquid::Template;

/// Default entry lifetime.
const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Caches parsed template ASTs by logical render key.
///
/// Keys are render identities (`section:<type>`, `snippet:<name>`,
/// `layout:theme`), independent of the store's path keys. Entries expire
/// a fixed age after insertion, checked lazily on `get`; an expired entry
/// is removed and reported as absent.
#[derive(Debug)]
pub struct ParsedTemplateCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    inserted_at: Instant,
    template: Arc<Template>,
}

impl ParsedTemplateCache {
    /// Creates a cache with the default five-minute TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Creates a cache with an explicit TTL (tests use short ones).
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached template for `key`, unless it has expired.
    pub fn get(&self, key: &str) -> Option<Arc<Template>> {
        let mut entries = self.entries.lock().ok()?;
        match entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                Some(Arc::clone(&entry.template))
            }
            Some(_) => {
                debug!("[CACHE] '{key}' expired, evicting");
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores a parsed template under `key`, resetting its age.
    pub fn set(&self, key: &str, template: Arc<Template>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                key.to_string(),
                CacheEntry {
                    inserted_at: Instant::now(),
                    template,
                },
            );
        }
    }

    /// Number of live-or-expired entries currently held.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops all entries.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

impl Default for ParsedTemplateCache {
    fn default() -> Self {
        Self::new()
    }
}
