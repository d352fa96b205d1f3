use rust_decimal::Decimal;
use tracing::error;

use crate::models::NormalizedMovement;
use crate::types::parse_ledger_date;

/// Stamps every movement with its running balance and returns them most recent first.
///
/// Movements are walked in chronological order starting from `starting_balance`;
/// each one's running balance includes its own amount. Chronological order is the
/// ledger date, then the document number; anything still tied keeps its input order.
/// Movements whose date cannot be parsed are treated as the oldest.
pub fn reconcile(movements: Vec<NormalizedMovement>, starting_balance: Decimal) -> Vec<NormalizedMovement> {
    let mut ordered = movements;
    ordered.sort_by_cached_key(|movement| (parse_ledger_date(&movement.original_date), movement.document_number));

    let mut balance = starting_balance;

    for movement in ordered.iter_mut() {
        match balance.checked_add(movement.amount) {
            Some(next) => balance = next,
            None => error!("Running balance overflow at document [{}]", movement.document_number),
        }

        movement.running_balance = balance;
    }

    ordered.reverse();
    ordered
}
