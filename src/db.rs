/*! This module defines and implements traits for interacting with the application's database. */

use rusqlite::{Connection, Error, Row};

use crate::models::{Budget, Category, Transaction};

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create a table for the model.
    ///
    /// # Errors
    /// Returns an error if the table already exists or if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), Error>;
}

/// A trait for mapping from a `rusqlite::Row` from a SQLite database to a concrete rust type.
///
/// The `offset` variant exists so that types embedding other types (e.g. a
/// transaction joined with its category) can delegate to the embedded type's
/// mapping with the right starting column.
pub trait MapRow {
    /// The type that the database row maps to.
    type ReturnType;

    /// Map `row` to `ReturnType` starting from the first column.
    ///
    /// # Errors
    /// Returns an error if a column is missing or cannot be converted.
    fn map_row(row: &Row) -> Result<Self::ReturnType, Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Map `row` to `ReturnType` starting from the column at `offset`.
    ///
    /// # Errors
    /// Returns an error if a column is missing or cannot be converted.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, Error>;
}

/// Create the tables for the domain models [Category], [Transaction] and
/// [Budget] in the database.
///
/// # Errors
/// Returns an error if the tables already exist or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Referential integrity between transactions/budgets and categories.
    connection.execute("PRAGMA foreign_keys = ON", ())?;

    Category::create_table(connection)?;
    Transaction::create_table(connection)?;
    Budget::create_table(connection)?;

    Ok(())
}
