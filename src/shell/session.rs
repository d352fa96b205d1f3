use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, error, info, warn};

use crate::api::{BalanceStore, DataSource, FetchError};
use crate::engine::ClientStatement;
use crate::models::InitialBalance;
use crate::report::{Report, export};
use crate::shell::SessionError;
use crate::storage::Storage;
use crate::types::{ClientId, parse_minor_units, today};

const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Identifies one fetch so its result can be dropped if the selection moved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub client_id: ClientId,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Updated,
    /// The selection changed while the request was out.
    Discarded,
}

/// Initial balance as typed by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceDraft {
    /// Cents without separators, e.g. `150075` for 1500.75.
    pub amount_text: String,
    pub negative: bool,
    /// `YYYY-MM-DD`; today when absent.
    pub date: Option<String>,
}

impl BalanceDraft {
    pub fn to_balance(&self) -> Result<InitialBalance, SessionError> {
        let amount = parse_minor_units(&self.amount_text, self.negative)
            .map_err(|error| SessionError::Validation(error.to_string()))?;

        let date = match self.date.as_deref().map(str::trim) {
            Some(text) => NaiveDate::parse_from_str(text, DATE_INPUT_FORMAT)
                .map_err(|_| SessionError::Validation(format!("Please enter a valid date (YYYY-MM-DD), got [{text}]")))?,
            None => today(),
        };

        Ok(InitialBalance {
            last_modified: Some(Utc::now().to_rfc3339()),
            ..InitialBalance::new(amount, date.format(DATE_INPUT_FORMAT).to_string())
        })
    }
}

/// State of one operator session: the selected client and what was fetched for it.
pub struct Session<S: Storage, B: BalanceStore> {
    source: Arc<DataSource<S>>,
    balances: Arc<B>,
    selected: Option<ClientId>,
    generation: u64,
    in_flight: bool,
    statement: Option<ClientStatement>,
    pending_balance: Option<BalanceDraft>,
}

impl<S: Storage, B: BalanceStore> Session<S, B> {
    pub fn new(source: Arc<DataSource<S>>, balances: Arc<B>) -> Self {
        Self {
            source,
            balances,
            selected: None,
            generation: 0,
            in_flight: false,
            statement: None,
            pending_balance: None,
        }
    }

    pub fn selected(&self) -> Option<ClientId> {
        self.selected
    }

    pub fn statement(&self) -> Option<&ClientStatement> {
        self.statement.as_ref()
    }

    /// Input kept from the last balance save that did not go through.
    pub fn pending_balance(&self) -> Option<&BalanceDraft> {
        self.pending_balance.as_ref()
    }

    #[cfg(test)]
    pub fn is_fetching(&self) -> bool {
        self.in_flight
    }

    /// Switches to another client, dropping everything shown for the previous one.
    /// A fetch still out for the previous client is ignored when it lands.
    pub fn select(&mut self, client_id: ClientId) -> Result<(), SessionError> {
        if client_id == 0 {
            return Err(SessionError::NoClientSelected)
        }

        if self.selected != Some(client_id) {
            debug!("Selected client [{client_id}]");
            self.generation += 1;
            self.in_flight = false;
            self.statement = None;
            self.pending_balance = None;
        }

        self.selected = Some(client_id);

        Ok(())
    }

    pub fn begin_fetch(&mut self) -> Result<FetchTicket, SessionError> {
        let client_id = self.selected.ok_or(SessionError::NoClientSelected)?;

        if self.in_flight {
            return Err(SessionError::FetchInProgress(client_id))
        }

        self.in_flight = true;

        Ok(FetchTicket { client_id, generation: self.generation })
    }

    /// The request half of a fetch. It borrows nothing from the session, so the
    /// selection can change while it runs.
    pub fn load(&self, ticket: FetchTicket) -> impl Future<Output = Result<ClientStatement, FetchError>> + use<S, B> {
        let source = self.source.clone();
        let balances = self.balances.clone();

        async move { load_statement(&source, balances.as_ref(), ticket.client_id).await }
    }

    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<ClientStatement, FetchError>) -> Result<FetchOutcome, SessionError> {
        if ticket.generation != self.generation {
            debug!("Discarding fetch result for client [{}], selection changed", ticket.client_id);
            return Ok(FetchOutcome::Discarded)
        }

        self.in_flight = false;
        let statement = result?;

        info!("Loaded {} movements for client [{}]", statement.movements.len(), ticket.client_id);
        self.statement = Some(statement);

        Ok(FetchOutcome::Updated)
    }

    pub async fn fetch(&mut self) -> Result<FetchOutcome, SessionError> {
        let ticket = self.begin_fetch()?;
        let result = self.load(ticket).await;

        self.complete_fetch(ticket, result)
    }

    /// Validates and stores the initial balance. On any failure the draft is
    /// kept so the operator can retry it; the write itself is never repeated.
    pub async fn save_balance(&mut self, draft: BalanceDraft) -> Result<InitialBalance, SessionError> {
        let client_id = self.selected.ok_or(SessionError::NoClientSelected)?;

        let balance = match draft.to_balance() {
            Ok(balance) => balance,
            Err(error) => {
                self.pending_balance = Some(draft);
                return Err(error)
            }
        };

        match self.balances.set(client_id, &balance).await {
            Ok(()) => {
                self.pending_balance = None;
                Ok(balance)
            }
            Err(source) => {
                error!("Saving initial balance for client [{client_id}] failed: {source}");
                self.pending_balance = Some(draft);
                Err(SessionError::Balance(source))
            }
        }
    }

    pub async fn delete_balance(&mut self) -> Result<(), SessionError> {
        let client_id = self.selected.ok_or(SessionError::NoClientSelected)?;

        self.balances.delete(client_id).await.map_err(|source| {
            error!("Deleting initial balance for client [{client_id}] failed: {source}");
            SessionError::Balance(source)
        })?;

        self.pending_balance = None;

        Ok(())
    }

    pub fn export(&self, path: &Path) -> Result<PathBuf, SessionError> {
        let statement = self.statement.as_ref()
            .filter(|statement| !statement.is_empty())
            .ok_or(SessionError::NoMovements)?;

        Ok(export(&Report::from_statement(statement), path)?)
    }
}

/// Movements and initial balance are requested together. A balance that
/// cannot be read is treated as absent rather than failing the fetch.
pub async fn load_statement<S: Storage, B: BalanceStore>(source: &DataSource<S>, balances: &B, client_id: ClientId) -> Result<ClientStatement, FetchError> {
    let (movements, balance) = tokio::join!(source.movements(client_id), balances.get(client_id));

    let movements = movements?;
    let balance = balance.unwrap_or_else(|error| {
        warn!("Could not read initial balance for client [{client_id}]: {error}");
        None
    });

    let statement = ClientStatement::build(client_id, &movements.data, balance);

    Ok(if movements.from_cache {
        statement.with_cache_origin(movements.last_update)
    } else {
        statement
    })
}
