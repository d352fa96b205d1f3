use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::{ApiError, RetryPolicy};
use crate::config::{BalanceFields, Config};
use crate::models::{ClientRecord, RawMovement};
use crate::types::ClientId;

const CLIENTS_PATH: &str = "Consulta";
const MOVEMENTS_PATH: &str = "movimientos";
const HEALTH_PATH: &str = "health";

/// HTTP client for the ledger API.
///
/// Holds no state beyond its configuration; clone it freely to share the
/// underlying connection pool.
#[derive(Debug, Clone)]
pub struct LedgerClient {
    http: Client,
    base_url: String,
    pub(super) balance_path: String,
    pub(super) fields: BalanceFields,
    customer_limit: u32,
    retry: RetryPolicy
}

impl LedgerClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            balance_path: config.balance_path.trim_matches('/').to_string(),
            fields: config.balance_fields,
            customer_limit: config.customer_limit,
            retry: RetryPolicy::from_config(config)
        })
    }

    pub(super) fn http(&self) -> &Client {
        &self.http
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `GET /Consulta?limit=N`, retried on transient failures.
    pub async fn fetch_clients(&self) -> Result<Vec<ClientRecord>, ApiError> {
        let query = [("limit", self.customer_limit.to_string())];

        self.retry.run(CLIENTS_PATH, || self.get_records(CLIENTS_PATH, &query)).await
    }

    /// `GET /movimientos?clienteId=ID`, retried on transient failures.
    pub async fn fetch_movements(&self, client_id: ClientId) -> Result<Vec<RawMovement>, ApiError> {
        let query = [("clienteId", client_id.to_string())];

        self.retry.run(MOVEMENTS_PATH, || self.get_records(MOVEMENTS_PATH, &query)).await
    }

    /// Any 2xx from `GET /health` counts as connected.
    pub async fn health(&self) -> bool {
        let url = self.url(HEALTH_PATH);

        match self.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(error) => {
                debug!("Health probe to {url} failed: {error}");
                false
            }
        }
    }

    /// One attempt at a list endpoint. An empty list is reported as [`ApiError::Empty`].
    async fn get_records<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<T>, ApiError> {
        let url = self.url(path);
        debug!("GET {url} {query:?}");

        let response = self.http.get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| ApiError::Transport { url: url.clone(), source })?;

        let response = check_status(&url, response).await?;

        let records: Vec<T> = response.json().await
            .map_err(|error| ApiError::Decode { url: url.clone(), reason: error.to_string() })?;

        if records.is_empty() {
            return Err(ApiError::Empty { url })
        }

        debug!("GET {url} returned {} records", records.len());

        Ok(records)
    }
}

pub(super) async fn check_status(url: &str, response: Response) -> Result<Response, ApiError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response)
    }

    let body = response.text().await.unwrap_or_default();

    Err(ApiError::status(url, status.as_u16(), &body))
}
