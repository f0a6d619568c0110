//! Per-month income/expense totals and the expenses-by-category breakdown.

use std::collections::HashMap;

use serde::Serialize;
use time::Month;

use crate::{
    Error,
    models::{DatabaseID, Kind, Transaction, UserID},
    reports::{DateWindow, expand},
    stores::{LedgerStore, TransactionFilter},
};

/// Income and expense totals for one calendar month.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct MonthTotals {
    /// Sum of all income occurrences in the month.
    pub income: f64,
    /// Sum of all expense occurrences in the month.
    pub expenses: f64,
}

/// The total spent in one expense category over one calendar month.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpend {
    /// The ID of the category.
    pub category_id: DatabaseID,
    /// The display name of the category.
    pub name: String,
    /// The display color of the category.
    pub color: String,
    /// The summed expense occurrences for the category in the month.
    pub total: f64,
}

/// Income and expense totals of `user_id` for one calendar month.
///
/// Recurring transactions anchored in earlier months contribute the
/// occurrences that land inside the month.
///
/// # Errors
/// Returns [Error::InvalidYear] for an unrepresentable year; store errors
/// are propagated unchanged.
pub fn month_totals<S: LedgerStore>(
    store: &S,
    user_id: UserID,
    month: Month,
    year: i32,
) -> Result<MonthTotals, Error> {
    let window = DateWindow::month_of(month, year)?;
    let transactions =
        store.list_paid_transactions(user_id, TransactionFilter::up_to(window.end()))?;

    Ok(totals_in_window(&transactions, window))
}

/// Sums per-kind occurrence totals inside `window` for an already fetched
/// snapshot. The snapshot must include every transaction anchored on or
/// before the window's end.
pub(crate) fn totals_in_window(transactions: &[Transaction], window: DateWindow) -> MonthTotals {
    let mut totals = MonthTotals::default();

    for transaction in transactions {
        let amount = expand::occurrence_sum(transaction, window);
        match transaction.kind() {
            Kind::Income => totals.income += amount,
            Kind::Expense => totals.expenses += amount,
        }
    }

    totals
}

/// The expense total per category of `user_id` for one calendar month,
/// sorted by total descending.
///
/// Categories with no expense occurrences in the month are omitted rather
/// than reported as zero. Each entry carries the category's display name
/// and color for charting.
///
/// # Errors
/// Returns [Error::InvalidYear] for an unrepresentable year; store errors
/// are propagated unchanged.
pub fn expenses_by_category<S: LedgerStore>(
    store: &S,
    user_id: UserID,
    month: Month,
    year: i32,
) -> Result<Vec<CategorySpend>, Error> {
    let window = DateWindow::month_of(month, year)?;
    let filter = TransactionFilter {
        kind: Some(Kind::Expense),
        date_up_to: window.end(),
    };
    let transactions = store.list_paid_transactions(user_id, filter)?;

    let mut by_category: HashMap<DatabaseID, CategorySpend> = HashMap::new();

    for transaction in &transactions {
        let amount = expand::occurrence_sum(transaction, window);
        if amount <= 0.0 {
            continue;
        }

        let category = transaction.category();
        by_category
            .entry(category.id)
            .or_insert_with(|| CategorySpend {
                category_id: category.id,
                name: category.name.clone(),
                color: category.color.clone(),
                total: 0.0,
            })
            .total += amount;
    }

    let mut spending: Vec<CategorySpend> = by_category.into_values().collect();
    spending.sort_by(|a, b| b.total.total_cmp(&a.total));

    Ok(spending)
}
