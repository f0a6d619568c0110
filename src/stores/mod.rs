//! Contains the read-only store trait the aggregation engine consumes, and
//! its SQLite implementation.

use time::{Date, Month};

use crate::{
    Error,
    models::{Budget, Kind, Transaction, UserID},
};

pub mod sqlite;

pub use sqlite::SqliteLedgerStore;

/// Selects which paid transactions [LedgerStore::list_paid_transactions]
/// returns.
#[derive(Clone, Copy, Debug)]
pub struct TransactionFilter {
    /// Only include transactions of this kind. `None` includes both kinds.
    pub kind: Option<Kind>,
    /// Only include transactions anchored on or before this date.
    ///
    /// Recurring transactions anchored within the bound can still produce
    /// occurrences after it; this bounds the anchors, not the occurrences.
    pub date_up_to: Date,
}

impl TransactionFilter {
    /// A filter for both kinds with the given anchor date bound.
    pub fn up_to(date: Date) -> Self {
        Self {
            kind: None,
            date_up_to: date,
        }
    }
}

/// Read-only access to the stored ledger: transactions and budget limits.
///
/// The aggregation engine fetches a fresh snapshot through this trait on
/// every call and never writes through it.
pub trait LedgerStore {
    /// All PAID transactions of `user_id` matching `filter`, each with its
    /// category resolved, ordered by anchor date ascending.
    ///
    /// PENDING transactions never appear: they are excluded from every
    /// balance, total and alert.
    fn list_paid_transactions(
        &self,
        user_id: UserID,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>, Error>;

    /// The stored budget limits of `user_id` for one calendar month, each
    /// with its category resolved.
    fn list_budgets(&self, user_id: UserID, month: Month, year: i32)
    -> Result<Vec<Budget>, Error>;
}
