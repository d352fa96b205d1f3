use rust_decimal::Decimal;

use crate::engine::{normalize, reconcile};
use crate::models::{InitialBalance, NormalizedMovement, RawMovement};
use crate::types::ClientId;

/// Everything shown for the selected customer after a fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientStatement {
    pub client_id: ClientId,
    /// Reconciled movements, most recent first.
    pub movements: Vec<NormalizedMovement>,
    pub initial_balance: Option<InitialBalance>,
    /// Set when the movements came from the local cache instead of the ledger.
    pub from_cache: bool,
    pub last_update: Option<String>,
}

impl ClientStatement {
    /// Runs the normalize-then-reconcile pipeline, seeded with the initial balance or zero.
    pub fn build(client_id: ClientId, raw_movements: &[RawMovement], initial_balance: Option<InitialBalance>) -> Self {
        let starting_balance = initial_balance.as_ref()
            .map(|balance| balance.amount)
            .unwrap_or_default();

        let normalized = raw_movements.iter().map(normalize).collect();

        Self {
            client_id,
            movements: reconcile(normalized, starting_balance),
            initial_balance,
            from_cache: false,
            last_update: None,
        }
    }

    pub fn with_cache_origin(mut self, last_update: Option<String>) -> Self {
        self.from_cache = true;
        self.last_update = last_update;
        self
    }

    /// Balance after the most recent movement, else the initial balance, else zero.
    pub fn current_balance(&self) -> Decimal {
        self.movements.first()
            .map(|movement| movement.running_balance)
            .or_else(|| self.initial_balance.as_ref().map(|balance| balance.amount))
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }
}
