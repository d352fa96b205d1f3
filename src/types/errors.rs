use std::num::ParseIntError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmountInputError {
    #[error("Please enter an amount")]
    Empty,
    #[error("Please enter a valid amount: unexpected character '{0}'")]
    InvalidCharacter(char),
    #[error("Please enter a valid amount: {0}")]
    ParseInt(#[from] ParseIntError),
}
