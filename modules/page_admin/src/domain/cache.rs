//! Shared page cache, invalidated synchronously on every write

use crate::contract::PageId;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Cached latest slot values, keyed by page
pub trait PageCache: Send + Sync {
    /// Outer None: not cached. Inner None: cached as "no content"
    fn get(&self, page_id: PageId, language: &str, slot: &str) -> Option<Option<String>>;

    fn put(&self, page_id: PageId, language: &str, slot: &str, value: Option<String>);

    /// Forget everything cached for a page
    fn invalidate(&self, page_id: PageId);
}

type SlotKey = (String, String); // (language, slot)

/// In-process cache shared by every request
#[derive(Clone, Default)]
pub struct InMemoryPageCache {
    entries: Arc<RwLock<HashMap<PageId, HashMap<SlotKey, Option<String>>>>>,
}

impl InMemoryPageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached slot values for a page
    pub fn cached_entries(&self, page_id: PageId) -> usize {
        self.entries.read().get(&page_id).map_or(0, HashMap::len)
    }
}

impl PageCache for InMemoryPageCache {
    fn get(&self, page_id: PageId, language: &str, slot: &str) -> Option<Option<String>> {
        self.entries
            .read()
            .get(&page_id)
            .and_then(|slots| slots.get(&(language.to_string(), slot.to_string())))
            .cloned()
    }

    fn put(&self, page_id: PageId, language: &str, slot: &str, value: Option<String>) {
        self.entries
            .write()
            .entry(page_id)
            .or_default()
            .insert((language.to_string(), slot.to_string()), value);
    }

    fn invalidate(&self, page_id: PageId) {
        if self.entries.write().remove(&page_id).is_some() {
            tracing::trace!(page_id, "page cache invalidated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_invalidate() {
        let cache = InMemoryPageCache::new();
        assert_eq!(cache.get(1, "en", "title"), None);

        cache.put(1, "en", "title", Some("Home".to_string()));
        cache.put(1, "fr", "title", None);
        cache.put(2, "en", "title", Some("About".to_string()));

        assert_eq!(cache.get(1, "en", "title"), Some(Some("Home".to_string())));
        assert_eq!(cache.get(1, "fr", "title"), Some(None));
        assert_eq!(cache.cached_entries(1), 2);

        cache.invalidate(1);
        assert_eq!(cache.get(1, "en", "title"), None);
        assert_eq!(cache.cached_entries(1), 0);
        assert_eq!(cache.get(2, "en", "title"), Some(Some("About".to_string())));
    }
}
