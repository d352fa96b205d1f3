mod file_storage;
mod memory_storage;
mod response_cache;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;
pub use response_cache::{CacheLookup, ResponseCache};

/// A cached API response and the moment it was received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub data: Value,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Best-effort key-value persistence for cached responses.
///
/// Failures are never reported to callers: a lost write only means a later
/// offline read finds nothing.
pub trait Storage: Send + Sync + 'static {
    fn load(&self, key: &str) -> Option<CacheEntry>;
    fn save(&self, key: &str, entry: CacheEntry);
}
