
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

use crate::api::{DataSource, FetchError};
use crate::models::ClientEntry;
use crate::storage::Storage;
use crate::types::ClientId;

const MAX_LISTINGS: u64 = 1;

/// Searchable customer list.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryListing {
    pub entries: Vec<ClientEntry>,
    pub from_cache: bool,
    pub last_update: Option<String>
}

impl DirectoryListing {
    pub fn search(&self, query: &str) -> Vec<&ClientEntry> {
        self.entries.iter().filter(|entry| entry.matches(query)).collect()
    }

    pub fn find(&self, id: ClientId) -> Option<&ClientEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }
}

/// Customer list reused for a short window before asking the ledger again.
///
/// Only live listings are kept; a listing served from the offline cache is
/// requested again on the next call.
pub struct ClientDirectory<S: Storage> {
    source: Arc<DataSource<S>>,
    listings: Cache<(), Arc<DirectoryListing>>
}

impl<S: Storage> ClientDirectory<S> {
    pub fn new(source: Arc<DataSource<S>>, time_to_live: Duration) -> Self {
        let listings = Cache::builder()
            .max_capacity(MAX_LISTINGS)
            .time_to_live(time_to_live)
            .build();

        Self { source, listings }
    }

    pub async fn listing(&self) -> Result<Arc<DirectoryListing>, FetchError> {
        if let Some(listing) = self.listings.get(&()).await {
            debug!("Reusing client listing with {} entries", listing.entries.len());
            return Ok(listing)
        }

        let fetched = self.source.clients().await?;
        let listing = Arc::new(DirectoryListing {
            entries: fetched.data.iter().filter_map(ClientEntry::from_record).collect(),
            from_cache: fetched.from_cache,
            last_update: fetched.last_update
        });

        if !listing.from_cache {
            self.listings.insert((), listing.clone()).await;
        }

        Ok(listing)
    }

    #[cfg(test)]
    pub async fn search(&self, query: &str) -> Result<Vec<ClientEntry>, FetchError> {
        let listing = self.listing().await?;

        Ok(listing.search(query).into_iter().cloned().collect())
    }

    /// Forces the next listing to be requested from the ledger.
    pub fn invalidate(&self) {
        self.listings.invalidate_all();
    }
}
