use crate::storage::{CacheEntry, Storage};
use dashmap::DashMap;
use std::sync::Arc;

/// Process-lifetime storage, used when no cache directory is available and in tests.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Arc<DashMap<String, CacheEntry>>
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn save(&self, key: &str, entry: CacheEntry) {
        self.entries.insert(key.to_string(), entry);
    }
}
