//! This file defines the `Budget` type: a monthly spending cap for one
//! expense category.

use serde::{Deserialize, Serialize};
use time::Month;

use crate::models::{Category, DatabaseID, UserID};

/// A spending limit for one category in one calendar month.
///
/// Limits only apply to expense categories; that rule is validated where
/// budgets are created. The engine compares the limit against the computed
/// spend for the same `(month, year, category)` triple.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// The ID of the budget.
    pub id: DatabaseID,
    /// The user that owns the budget.
    pub user_id: UserID,
    /// The resolved category the limit applies to.
    pub category: Category,
    /// The calendar month the limit applies to.
    pub month: Month,
    /// The calendar year the limit applies to.
    pub year: i32,
    /// The spending cap for the period.
    pub limit: f64,
}
