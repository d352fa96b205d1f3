mod balance;
mod client;
mod errors;
mod fetch;
mod retry;

pub use balance::BalanceStore;
pub use client::LedgerClient;
pub use errors::ApiError;
pub use fetch::{DataSource, FetchError, Fetched};
pub use retry::RetryPolicy;
