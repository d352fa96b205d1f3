use std::future::Future;
use std::str::FromStr;

use chrono::Utc;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use crate::api::client::check_status;
use crate::api::{ApiError, LedgerClient};
use crate::config::BalanceFields;
use crate::models::InitialBalance;
use crate::types::ClientId;

/// Where initial balances live.
///
/// Writes are attempted exactly once. A failed `set` or `delete` must be
/// assumed not to have happened.
pub trait BalanceStore: Send + Sync + 'static {
    fn get(&self, client_id: ClientId) -> impl Future<Output = Result<Option<InitialBalance>, ApiError>> + Send;
    fn set(&self, client_id: ClientId, balance: &InitialBalance) -> impl Future<Output = Result<(), ApiError>> + Send;
    fn delete(&self, client_id: ClientId) -> impl Future<Output = Result<(), ApiError>> + Send;
}

impl LedgerClient {
    fn balance_url(&self, client_id: ClientId) -> String {
        self.url(&format!("{}/{client_id}", self.balance_path))
    }
}

impl BalanceStore for LedgerClient {
    async fn get(&self, client_id: ClientId) -> Result<Option<InitialBalance>, ApiError> {
        let url = self.balance_url(client_id);
        debug!("GET {url}");

        let response = self.http().get(&url)
            .send()
            .await
            .map_err(|source| ApiError::Transport { url: url.clone(), source })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None)
        }

        let body = check_status(&url, response).await?
            .text()
            .await
            .map_err(|source| ApiError::Transport { url: url.clone(), source })?;

        if body.trim().is_empty() {
            return Ok(None)
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|error| ApiError::Decode { url: url.clone(), reason: error.to_string() })?;

        Ok(decode_balance(&value, self.fields))
    }

    async fn set(&self, client_id: ClientId, balance: &InitialBalance) -> Result<(), ApiError> {
        let url = self.balance_url(client_id);
        let body = encode_balance(balance, self.fields);
        debug!("POST {url} {body}");

        let response = self.http().post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|source| ApiError::Transport { url: url.clone(), source })?;

        check_status(&url, response).await?;

        info!("Initial balance for client [{client_id}] saved: {} as of {}", balance.amount, balance.date);

        Ok(())
    }

    async fn delete(&self, client_id: ClientId) -> Result<(), ApiError> {
        let url = self.balance_url(client_id);
        debug!("DELETE {url}");

        let response = self.http().delete(&url)
            .send()
            .await
            .map_err(|source| ApiError::Transport { url: url.clone(), source })?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("No initial balance to delete for client [{client_id}]");
            return Ok(())
        }

        check_status(&url, response).await?;

        info!("Initial balance for client [{client_id}] deleted");

        Ok(())
    }
}

/// Request body for `POST /saldos/<id>`. The amount travels as a JSON number.
pub fn encode_balance(balance: &InitialBalance, fields: BalanceFields) -> Value {
    let last_modified = balance.last_modified.clone()
        .unwrap_or_else(|| Utc::now().to_rfc3339());

    let mut body = Map::new();
    body.insert(fields.amount().to_string(), json!(balance.amount.to_f64()));
    body.insert(fields.date().to_string(), json!(balance.date));
    body.insert(fields.last_modified().to_string(), json!(last_modified));

    Value::Object(body)
}

/// Reads a stored balance. `null`, a non-object, or a record without an amount is absent.
pub fn decode_balance(value: &Value, fields: BalanceFields) -> Option<InitialBalance> {
    let record = value.as_object()?;

    let amount = match record.get(fields.amount()) {
        Some(Value::Number(number)) => parse_decimal(&number.to_string()),
        Some(Value::String(text)) => parse_decimal(text),
        _ => None
    };

    let Some(amount) = amount else {
        warn!("Stored initial balance has no readable [{}] field: {value}", fields.amount());
        return None
    };

    let date = record.get(fields.date())
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let last_modified = record.get(fields.last_modified())
        .and_then(Value::as_str)
        .map(str::to_string);

    Some(InitialBalance { last_modified, ..InitialBalance::new(amount, date) })
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}
