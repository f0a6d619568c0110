//! Implements a struct that holds the state of the REST server.

use crate::stores::SqliteLedgerStore;

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The store used to query transactions and budgets.
    pub store: SqliteLedgerStore,
}

impl AppState {
    /// Create a new [AppState] from a ledger store.
    pub fn new(store: SqliteLedgerStore) -> Self {
        Self { store }
    }
}
