use crate::models::{Category, NormalizedMovement, RawMovement, UNSPECIFIED_PAYMENT_METHOD};
use crate::types::format_ledger_date;

/// Turns one ledger entry into a [`NormalizedMovement`].
///
/// The signed amount keeps the magnitude of the gross amount. Invoices are
/// negative since they raise what the customer owes; receipts, credit notes,
/// debit notes and unrecognized documents are positive. Never fails: an
/// unparseable date is shown as received and an unknown code as its own label.
pub fn normalize(raw: &RawMovement) -> NormalizedMovement {
    let category = Category::resolve(&raw.document_type);
    let magnitude = raw.total_amount.abs();
    let amount = if category.is_invoice() { -magnitude } else { magnitude };

    let payment_method = raw.payment_method.as_deref()
        .map(str::trim)
        .filter(|method| !method.is_empty())
        .unwrap_or(UNSPECIFIED_PAYMENT_METHOD)
        .to_string();

    NormalizedMovement {
        display_date: format_ledger_date(&raw.date),
        original_date: raw.date.clone(),
        category,
        amount,
        payment_method,
        running_balance: Default::default(),
        document_number: raw.document_number,
        raw: raw.clone(),
    }
}
