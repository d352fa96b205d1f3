use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::storage::{CacheEntry, Storage};

/// One JSON file per key under a cache directory.
pub struct FileStorage {
    directory: PathBuf
}

impl FileStorage {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into()
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Option<CacheEntry> {
        let path = self.path_for(key);
        let contents = fs::read_to_string(&path).ok()?;

        match serde_json::from_str(&contents) {
            Ok(entry) => Some(entry),
            Err(error) => {
                warn!("Discarding unreadable cache entry at path: {} | {error}", path.display());
                None
            }
        }
    }

    fn save(&self, key: &str, entry: CacheEntry) {
        let path = self.path_for(key);

        let result = fs::create_dir_all(&self.directory)
            .map_err(|error| error.to_string())
            .and_then(|_| serde_json::to_vec(&entry).map_err(|error| error.to_string()))
            .and_then(|bytes| fs::write(&path, bytes).map_err(|error| error.to_string()));

        match result {
            Ok(()) => debug!("Cache entry [{key}] written to {}", path.display()),
            Err(error) => warn!("Could not write cache entry at path: {} | {error}", path.display()),
        }
    }
}
