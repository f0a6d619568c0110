//! This file defines the `Category` type, the label a transaction or budget
//! is grouped under.

use serde::{Deserialize, Serialize};

use crate::models::{DatabaseID, Kind, UserID};

/// A label for grouping transactions, e.g. "Groceries" or "Salary".
///
/// Categories with no owner (`user_id` is `None`) are system categories
/// visible to every user. The engine only reads categories for labeling and
/// grouping; it never creates or mutates them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// The ID of the category.
    pub id: DatabaseID,
    /// The display name of the category.
    pub name: String,
    /// The display color of the category as a hex string, e.g. "#EF4444".
    pub color: String,
    /// Whether the category labels incomes or expenses.
    pub kind: Kind,
    /// The user that owns the category, or `None` for system categories.
    pub user_id: Option<UserID>,
}
