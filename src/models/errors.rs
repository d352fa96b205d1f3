/// Classes of failure the operator can be told about.
///
/// Every transport or validation failure is folded into one of these before
/// it reaches the screen. The detail that produced it only goes to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Timeout, reset, refused connection or no response at all.
    Connectivity,
    /// 404, or an empty list where records were expected.
    NotFound,
    /// 401 or 403.
    Unauthorized,
    /// 5xx after retries.
    Server,
    /// A balance save or delete that did not go through.
    Write,
    /// Rejected locally before any request was made.
    Validation(String),
    /// Anything else, including undecodable responses.
    Unexpected,
}

/// Whether a cached copy existed but was too old to be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Absent,
    Stale,
}

pub const OFFLINE_NOTICE: &str = "Showing locally stored data due to connection issues.";

impl ErrorKind {
    pub fn user_message(&self, cache: CacheState) -> String {
        let message = match (self, cache) {
            (ErrorKind::Connectivity, _) => "No server connection.",
            (ErrorKind::NotFound, CacheState::Absent) => "No records found for this client.",
            (ErrorKind::NotFound, CacheState::Stale) => "Client not found in locally stored data.",
            (ErrorKind::Unauthorized, _) => "You do not have permission to access this information.",
            (ErrorKind::Server, _) => "Server error. Please try again in a few minutes.",
            (ErrorKind::Write, _) => "Could not update the initial balance. Please try again.",
            (ErrorKind::Validation(message), _) => return message.clone(),
            (ErrorKind::Unexpected, _) => "Error retrieving data. Please try again.",
        };

        message.to_string()
    }

    /// Failures worth another attempt of an idempotent read.
    pub fn is_transient(&self) -> bool {
        matches!(self, ErrorKind::Connectivity | ErrorKind::Server)
    }

    /// Failed reads that may still be answered from a fresh cache entry.
    /// Permission errors must surface as-is.
    pub fn allows_cache_fallback(&self) -> bool {
        !matches!(self, ErrorKind::Unauthorized | ErrorKind::Validation(_))
    }
}
