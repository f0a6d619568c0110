//! Month summaries and the multi-month trend series built from them.

use serde::Serialize;
use time::{Date, Month};

use crate::{
    Error,
    models::UserID,
    reports::{DateWindow, balance, months_before, previous_month, totals},
    stores::{LedgerStore, TransactionFilter},
};

/// The headline figures for one calendar month.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    /// Net balance over all time, evaluated at `today` or at the month's
    /// end, whichever is later.
    pub balance: f64,
    /// Income total for the month window.
    pub income: f64,
    /// Expense total for the month window.
    pub expenses: f64,
    /// Percentage change of income versus the previous calendar month.
    pub income_delta: f64,
    /// Percentage change of expenses versus the previous calendar month.
    pub expenses_delta: f64,
}

/// One month of a trend series.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MonthlyPoint {
    /// The month number, 1 through 12.
    pub month: u8,
    /// The calendar year.
    pub year: i32,
    /// Income total for the month.
    pub income: f64,
    /// Expense total for the month.
    pub expenses: f64,
}

/// The summary of `(month, year)` for `user_id`.
///
/// The balance horizon is `max(today, month_end)`: querying the current or
/// a past month reports the balance as of today, querying a future month
/// reports the balance through that whole month. The income and expense
/// totals always use the fixed month window regardless of `today`; the
/// asymmetry is deliberate and relied upon by the dashboard.
///
/// Deltas compare against the immediately preceding calendar month:
/// `(current - previous) / previous * 100` when the previous total is
/// positive; a transition from zero to something reports 100, zero to zero
/// reports 0.
///
/// # Errors
/// Returns [Error::InvalidYear] for an unrepresentable year; store errors
/// are propagated unchanged.
pub fn month_summary<S: LedgerStore>(
    store: &S,
    user_id: UserID,
    month: Month,
    year: i32,
    today: Date,
) -> Result<MonthSummary, Error> {
    let window = DateWindow::month_of(month, year)?;
    let as_of = window.end().max(today);

    // One snapshot serves the balance, the month and the previous month:
    // the anchor bound `as_of` covers all three windows.
    let transactions = store.list_paid_transactions(user_id, TransactionFilter::up_to(as_of))?;

    let balance = balance::net_up_to(&transactions, as_of);
    let current = totals::totals_in_window(&transactions, window);

    let (prev_month, prev_year) = previous_month(month, year);
    let prev_window = DateWindow::month_of(prev_month, prev_year)?;
    let previous = totals::totals_in_window(&transactions, prev_window);

    Ok(MonthSummary {
        balance,
        income: current.income,
        expenses: current.expenses,
        income_delta: percent_delta(current.income, previous.income),
        expenses_delta: percent_delta(current.expenses, previous.expenses),
    })
}

/// A series of `month_count` consecutive months ending at `(month, year)`
/// inclusive, oldest first, each month summarized independently.
///
/// # Errors
/// Returns [Error::InvalidMonthCount] if `month_count` is zero, and
/// [Error::InvalidYear] if the series walks outside the representable
/// calendar range; store errors are propagated unchanged.
pub fn monthly_evolution<S: LedgerStore>(
    store: &S,
    user_id: UserID,
    month: Month,
    year: i32,
    month_count: u32,
    today: Date,
) -> Result<Vec<MonthlyPoint>, Error> {
    if month_count == 0 {
        return Err(Error::InvalidMonthCount);
    }

    let mut points = Vec::with_capacity(month_count as usize);

    for offset in (0..month_count).rev() {
        let (point_month, point_year) = months_before(month, year, offset);
        let summary = month_summary(store, user_id, point_month, point_year, today)?;

        points.push(MonthlyPoint {
            month: u8::from(point_month),
            year: point_year,
            income: summary.income,
            expenses: summary.expenses,
        });
    }

    Ok(points)
}

fn percent_delta(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else if current > 0.0 {
        100.0
    } else {
        0.0
    }
}
