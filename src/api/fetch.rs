use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::api::{ApiError, LedgerClient};
use crate::models::{CacheState, ClientRecord, ErrorKind, RawMovement};
use crate::storage::{CacheLookup, ResponseCache, Storage};
use crate::types::{ClientId, format_last_update};

/// Data returned by a read, live or from the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    pub from_cache: bool,
    /// `dd/mm/yyyy HH:MM` of the cached copy when `from_cache` is set.
    pub last_update: Option<String>
}

impl<T> Fetched<T> {
    fn live(data: T) -> Self {
        Self {
            data,
            from_cache: false,
            last_update: None
        }
    }
}

/// A read that failed live and could not be answered from the cache.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct FetchError {
    pub source: ApiError,
    pub cache: CacheState
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }

    pub fn user_message(&self) -> String {
        self.kind().user_message(self.cache)
    }
}

/// Live reads with a fallback to cached responses younger than the cache's time-to-live.
pub struct DataSource<S: Storage> {
    client: LedgerClient,
    cache: ResponseCache<S>
}

impl<S: Storage> DataSource<S> {
    pub fn new(client: LedgerClient, cache: ResponseCache<S>) -> Self {
        Self { client, cache }
    }

    pub async fn clients(&self) -> Result<Fetched<Vec<ClientRecord>>, FetchError> {
        match self.client.fetch_clients().await {
            Ok(clients) => {
                self.cache.save_clients(&clients, Utc::now());
                info!("Fetched {} clients", clients.len());
                Ok(Fetched::live(clients))
            }
            Err(error) => fall_back(error, || self.cache.clients(Utc::now()), "client list")
        }
    }

    pub async fn movements(&self, client_id: ClientId) -> Result<Fetched<Vec<RawMovement>>, FetchError> {
        match self.client.fetch_movements(client_id).await {
            Ok(movements) => {
                self.cache.save_movements(client_id, &movements, Utc::now());
                info!("Fetched {} movements for client [{client_id}]", movements.len());
                Ok(Fetched::live(movements))
            }
            Err(error) => fall_back(error, || self.cache.movements(client_id, Utc::now()), "movements")
        }
    }
}

fn fall_back<T>(error: ApiError, lookup: impl FnOnce() -> CacheLookup<T>, what: &str) -> Result<Fetched<T>, FetchError> {
    error!("Fetching {what} failed: {error}");

    if !error.kind().allows_cache_fallback() {
        return Err(FetchError { source: error, cache: CacheState::Absent })
    }

    match lookup() {
        CacheLookup::Fresh { data, timestamp } => {
            warn!("Using cached {what} from {timestamp}");
            Ok(Fetched {
                data,
                from_cache: true,
                last_update: Some(format_last_update(timestamp))
            })
        }
        CacheLookup::Stale => Err(FetchError { source: error, cache: CacheState::Stale }),
        CacheLookup::Missing => Err(FetchError { source: error, cache: CacheState::Absent })
    }
}
