//! Budget utilization and alert classification.

use std::collections::HashMap;

use serde::Serialize;
use time::Month;

use crate::{
    Error,
    models::{DatabaseID, UserID},
    reports::totals,
    stores::LedgerStore,
};

/// How close a budget is to its limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    /// Utilization below 80%.
    Ok,
    /// Utilization at or above 80%.
    Warning,
    /// Utilization at or above 100%.
    Danger,
}

impl AlertLevel {
    /// Classify a utilization percentage.
    ///
    /// The boundaries are exact: 79.99 is [AlertLevel::Ok], 80.0 is
    /// [AlertLevel::Warning] and 100.0 is [AlertLevel::Danger].
    pub fn classify(percent_used: f64) -> Self {
        if percent_used >= 100.0 {
            AlertLevel::Danger
        } else if percent_used >= 80.0 {
            AlertLevel::Warning
        } else {
            AlertLevel::Ok
        }
    }
}

/// One budget joined with the spend computed for its period.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    /// The ID of the budget.
    pub budget_id: DatabaseID,
    /// The ID of the budgeted category.
    pub category_id: DatabaseID,
    /// The display name of the budgeted category.
    pub category_name: String,
    /// The display color of the budgeted category.
    pub category_color: String,
    /// The stored spending cap.
    pub limit: f64,
    /// The computed expense total for the period, 0 when the category had
    /// no occurrences.
    pub spent: f64,
    /// `spent / limit * 100`, rounded to two decimal places; 0 when the
    /// limit is 0.
    pub percent_used: f64,
    /// The alert tier, classified on the unrounded percentage.
    pub alert: AlertLevel,
}

/// The utilization of every budget `user_id` stored for `(month, year)`.
///
/// Budgets whose category had no expense activity in the period still
/// appear, with `spent = 0`.
///
/// # Errors
/// Returns [Error::InvalidYear] for an unrepresentable year; store errors
/// are propagated unchanged.
pub fn budget_status<S: LedgerStore>(
    store: &S,
    user_id: UserID,
    month: Month,
    year: i32,
) -> Result<Vec<BudgetStatus>, Error> {
    let budgets = store.list_budgets(user_id, month, year)?;
    let spending = totals::expenses_by_category(store, user_id, month, year)?;

    let spent_by_category: HashMap<DatabaseID, f64> = spending
        .into_iter()
        .map(|spend| (spend.category_id, spend.total))
        .collect();

    let statuses = budgets
        .into_iter()
        .map(|budget| {
            let spent = spent_by_category
                .get(&budget.category.id)
                .copied()
                .unwrap_or(0.0);
            let percent_used = if budget.limit > 0.0 {
                spent / budget.limit * 100.0
            } else {
                0.0
            };

            BudgetStatus {
                budget_id: budget.id,
                category_id: budget.category.id,
                category_name: budget.category.name,
                category_color: budget.category.color,
                limit: budget.limit,
                spent,
                percent_used: round_to_two_decimals(percent_used),
                alert: AlertLevel::classify(percent_used),
            }
        })
        .collect();

    Ok(statuses)
}

fn round_to_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
