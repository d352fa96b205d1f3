mod currency;
mod dates;
mod errors;
#[cfg(test)]
mod tests;

pub use currency::{format_currency, parse_minor_units, round_for_display};
pub use dates::{format_last_update, format_ledger_date, parse_ledger_date, today};
pub use errors::AmountInputError;

pub type ClientId = u32;
pub type DocumentNumber = u64;
