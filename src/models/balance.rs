use rust_decimal::Decimal;

/// The manually entered opening balance of one customer.
///
/// The ledger has no opening balance of its own, so this seeds every
/// running balance computed for the customer.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialBalance {
    /// Signed amount. Negative means the customer started in debt.
    pub amount: Decimal,
    /// Effective date as stored, usually `YYYY-MM-DD`.
    pub date: String,
    /// RFC 3339 timestamp of the last save, when the backend reports one.
    pub last_modified: Option<String>,
}

impl InitialBalance {
    pub fn new(amount: Decimal, date: impl Into<String>) -> Self {
        Self {
            amount,
            date: date.into(),
            last_modified: None,
        }
    }
}
