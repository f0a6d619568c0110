//! This module defines the domain data types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

pub use budget::Budget;
pub use category::Category;
pub use transaction::{
    Kind, ParseEnumError, Recurrence, Transaction, TransactionStatus,
};

mod budget;
mod category;
mod transaction;

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;

/// The ID of a user of the application.
///
/// User records live outside this crate (authentication is handled by a
/// separate service); the engine only ever scopes queries by this ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
