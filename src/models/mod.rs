mod balance;
mod client;
mod errors;
mod movement;

pub use balance::InitialBalance;
pub use client::{ClientEntry, ClientRecord};
pub use errors::{CacheState, ErrorKind, OFFLINE_NOTICE};
pub use movement::{Category, NormalizedMovement, RawMovement, TRANSFER_PAYMENT_METHOD, UNSPECIFIED_PAYMENT_METHOD};
