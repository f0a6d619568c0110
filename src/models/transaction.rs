//! This file defines the type `Transaction`, the core type of the
//! aggregation engine, along with its kind, status and recurrence rule.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::models::{Category, DatabaseID, UserID};

/// An error returned when a stored string does not map to one of the
/// domain enums ([Kind], [TransactionStatus] or [Recurrence]).
#[derive(Debug, thiserror::Error, PartialEq)]
#[error("\"{value}\" is not a valid {kind}")]
pub struct ParseEnumError {
    value: String,
    kind: &'static str,
}

impl ParseEnumError {
    fn new(value: &str, kind: &'static str) -> Self {
        Self {
            value: value.to_owned(),
            kind,
        }
    }
}

/// Whether money was earned or spent.
///
/// Categories carry the same kind, and a transaction's category must match
/// the transaction's kind (enforced by the CRUD layer, assumed here).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Kind {
    /// Money coming in (wages, rent received).
    Income,
    /// Money going out (bills, groceries).
    Expense,
}

impl Kind {
    /// The string stored in the database for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Income => "INCOME",
            Kind::Expense => "EXPENSE",
        }
    }
}

impl FromStr for Kind {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "INCOME" => Ok(Kind::Income),
            "EXPENSE" => Ok(Kind::Expense),
            other => Err(ParseEnumError::new(other, "transaction kind")),
        }
    }
}

/// Whether a transaction has settled.
///
/// Only paid transactions participate in aggregation; pending ones are
/// invisible to every balance, total and alert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// The transaction has settled.
    Paid,
    /// The transaction is expected but has not settled yet.
    Pending,
}

impl TransactionStatus {
    /// The string stored in the database for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Paid => "PAID",
            TransactionStatus::Pending => "PENDING",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PAID" => Ok(TransactionStatus::Paid),
            "PENDING" => Ok(TransactionStatus::Pending),
            other => Err(ParseEnumError::new(other, "transaction status")),
        }
    }
}

/// How often a transaction repeats, starting from its anchor date.
///
/// A recurring transaction has no end date: it repeats indefinitely, and
/// queries bound the expansion by their own end date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recurrence {
    /// A single occurrence at the anchor date.
    None,
    /// Repeats every calendar month.
    Monthly,
    /// Repeats every calendar quarter.
    Quarterly,
    /// Repeats every year.
    Annual,
}

impl Recurrence {
    /// The number of months between occurrences, or `None` for a one-shot
    /// transaction.
    pub fn period_months(&self) -> Option<u8> {
        match self {
            Recurrence::None => None,
            Recurrence::Monthly => Some(1),
            Recurrence::Quarterly => Some(3),
            Recurrence::Annual => Some(12),
        }
    }

    /// The string stored in the database for this recurrence.
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::None => "NONE",
            Recurrence::Monthly => "MONTHLY",
            Recurrence::Quarterly => "QUARTERLY",
            Recurrence::Annual => "ANNUAL",
        }
    }
}

impl FromStr for Recurrence {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "NONE" => Ok(Recurrence::None),
            "MONTHLY" => Ok(Recurrence::Monthly),
            "QUARTERLY" => Ok(Recurrence::Quarterly),
            "ANNUAL" => Ok(Recurrence::Annual),
            other => Err(ParseEnumError::new(other, "recurrence")),
        }
    }
}

/// An expense or income, possibly repeating on a regular schedule.
///
/// `date` is the anchor: the calendar date of the first (or only)
/// occurrence. `amount` is the value of a single occurrence and is never
/// negative; the sign of a transaction's contribution to a balance comes
/// from its [Kind].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    id: DatabaseID,
    user_id: UserID,
    category: Category,
    kind: Kind,
    amount: f64,
    date: Date,
    recurrence: Recurrence,
    status: TransactionStatus,
    description: String,
}

impl Transaction {
    /// Create a transaction record.
    ///
    /// `amount` must be non-negative and `category.kind` must equal `kind`;
    /// both are validated where transactions are created and persisted, not
    /// here.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: DatabaseID,
        user_id: UserID,
        category: Category,
        kind: Kind,
        amount: f64,
        date: Date,
        recurrence: Recurrence,
        status: TransactionStatus,
        description: String,
    ) -> Self {
        Self {
            id,
            user_id,
            category,
            kind,
            amount,
            date,
            recurrence,
            status,
            description,
        }
    }

    /// The ID of the transaction.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// The ID of the user that owns this transaction.
    pub fn user_id(&self) -> UserID {
        self.user_id
    }

    /// The resolved category of the transaction.
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Whether this transaction is an income or an expense.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The amount of money of a single occurrence.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// The anchor date: when the first (or only) occurrence happened.
    pub fn date(&self) -> Date {
        self.date
    }

    /// The repetition rule of the transaction.
    pub fn recurrence(&self) -> Recurrence {
        self.recurrence
    }

    /// Whether the transaction has settled.
    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    /// A text description of what the transaction was for.
    pub fn description(&self) -> &str {
        &self.description
    }
}
