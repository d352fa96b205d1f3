use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::models::{ClientRecord, RawMovement};
use crate::storage::{CacheEntry, Storage};
use crate::types::ClientId;

const CLIENTS_KEY: &str = "clientes_cache";
const MOVEMENTS_KEY_PREFIX: &str = "movimientos_cache_";

/// Result of looking up a cached response.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup<T> {
    Fresh { data: T, timestamp: DateTime<Utc> },
    /// An entry exists but is older than the time-to-live.
    Stale,
    Missing,
}

/// Typed access to the customer list and per-customer movement caches.
pub struct ResponseCache<S: Storage> {
    storage: Arc<S>,
    time_to_live: Duration
}

impl<S: Storage> ResponseCache<S> {
    pub fn new(storage: Arc<S>, time_to_live: Duration) -> Self {
        Self {
            storage,
            time_to_live
        }
    }

    pub fn save_clients(&self, clients: &[ClientRecord], now: DateTime<Utc>) {
        self.save(CLIENTS_KEY, clients, now);
    }

    pub fn clients(&self, now: DateTime<Utc>) -> CacheLookup<Vec<ClientRecord>> {
        self.lookup(CLIENTS_KEY, now)
    }

    pub fn save_movements(&self, client_id: ClientId, movements: &[RawMovement], now: DateTime<Utc>) {
        self.save(&movements_key(client_id), movements, now);
    }

    pub fn movements(&self, client_id: ClientId, now: DateTime<Utc>) -> CacheLookup<Vec<RawMovement>> {
        self.lookup(&movements_key(client_id), now)
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, data: &T, now: DateTime<Utc>) {
        match serde_json::to_value(data) {
            Ok(data) => self.storage.save(key, CacheEntry { data, timestamp: now }),
            Err(error) => warn!("Could not serialize cache entry [{key}]: {error}"),
        }
    }

    fn lookup<T: DeserializeOwned>(&self, key: &str, now: DateTime<Utc>) -> CacheLookup<T> {
        let Some(entry) = self.storage.load(key) else {
            return CacheLookup::Missing
        };

        if now - entry.timestamp >= self.time_to_live {
            return CacheLookup::Stale
        }

        match serde_json::from_value(entry.data) {
            Ok(data) => CacheLookup::Fresh { data, timestamp: entry.timestamp },
            Err(error) => {
                warn!("Cache entry [{key}] no longer matches the expected shape: {error}");
                CacheLookup::Missing
            }
        }
    }
}

fn movements_key(client_id: ClientId) -> String {
    format!("{MOVEMENTS_KEY_PREFIX}{client_id}")
}
