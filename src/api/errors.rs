use thiserror::Error;

use crate::models::ErrorKind;

const MAX_BODY_IN_ERROR: usize = 200;

/// A failed call to the ledger API, with the detail needed for the log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Could not build HTTP client: {0}")]
    Client(reqwest::Error),
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        source: reqwest::Error
    },
    #[error("Request to {url} returned status [{status}]: {body}")]
    Status {
        url: String,
        status: u16,
        body: String
    },
    #[error("Request to {url} returned no records")]
    Empty {
        url: String
    },
    #[error("Response from {url} could not be decoded: {reason}")]
    Decode {
        url: String,
        reason: String
    }
}

impl ApiError {
    pub fn status(url: &str, status: u16, body: &str) -> Self {
        Self::Status {
            url: url.to_string(),
            status,
            body: body.chars().take(MAX_BODY_IN_ERROR).collect()
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport { source, .. } if source.is_decode() || source.is_builder() => ErrorKind::Unexpected,
            ApiError::Transport { .. } => ErrorKind::Connectivity,
            ApiError::Status { status: 401 | 403, .. } => ErrorKind::Unauthorized,
            ApiError::Status { status: 404, .. } => ErrorKind::NotFound,
            ApiError::Status { status, .. } if *status >= 500 => ErrorKind::Server,
            ApiError::Status { .. } => ErrorKind::Unexpected,
            ApiError::Empty { .. } => ErrorKind::NotFound,
            ApiError::Client(_) | ApiError::Decode { .. } => ErrorKind::Unexpected
        }
    }
}
