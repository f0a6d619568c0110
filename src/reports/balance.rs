//! Point-in-time balance computation.

use time::Date;

use crate::{
    Error,
    models::{Kind, UserID},
    reports::{DateWindow, expand},
    stores::{LedgerStore, TransactionFilter},
};

/// The net balance of `user_id` at the end of `as_of`: every occurrence of
/// every paid transaction up to and including that date, incomes positive
/// and expenses negative.
///
/// This is the only signed figure the engine produces; per-occurrence
/// amounts are always non-negative.
///
/// # Errors
/// Propagates store errors unchanged.
pub fn balance_as_of<S: LedgerStore>(
    store: &S,
    user_id: UserID,
    as_of: Date,
) -> Result<f64, Error> {
    let transactions = store.list_paid_transactions(user_id, TransactionFilter::up_to(as_of))?;

    Ok(net_up_to(&transactions, as_of))
}

/// Nets income against expense occurrences over `[epoch, as_of]` for an
/// already fetched snapshot.
pub(crate) fn net_up_to(transactions: &[crate::models::Transaction], as_of: Date) -> f64 {
    let window = DateWindow::up_to(as_of);
    let mut balance = 0.0;

    for transaction in transactions {
        let amount = expand::occurrence_sum(transaction, window);
        match transaction.kind() {
            Kind::Income => balance += amount,
            Kind::Expense => balance -= amount,
        }
    }

    balance
}
