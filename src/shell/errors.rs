use thiserror::Error;

use crate::api::{ApiError, FetchError};
use crate::models::{CacheState, ErrorKind};
use crate::report::ReportError;
use crate::types::ClientId;

pub const NO_MOVEMENTS_MESSAGE: &str = "No hay movimientos disponibles para este cliente.";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please select a valid client.")]
    NoClientSelected,

    #[error("Movements for client [{0}] are already being fetched")]
    FetchInProgress(ClientId),

    #[error("No hay movimientos disponibles para este cliente.")]
    NoMovements,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Initial balance update failed: {0}")]
    Balance(ApiError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

impl SessionError {
    /// What the operator is told. Transport detail stays in the log.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Fetch(error) => error.user_message(),
            SessionError::Balance(error) => match error.kind() {
                ErrorKind::Unauthorized => ErrorKind::Unauthorized.user_message(CacheState::Absent),
                _ => ErrorKind::Write.user_message(CacheState::Absent),
            },
            other => other.to_string(),
        }
    }
}
