//! Implements a SQLite backed ledger store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use time::{Date, Month};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{
        Budget, Category, DatabaseID, Kind, Recurrence, Transaction, TransactionStatus, UserID,
    },
    stores::{LedgerStore, TransactionFilter},
};

/// Stores the ledger (categories, transactions and budgets) in a SQLite
/// database.
///
/// The aggregation engine only uses the read-only [LedgerStore] methods. The
/// insert methods exist for the CRUD layer, seeding and tests.
#[derive(Debug, Clone)]
pub struct SqliteLedgerStore {
    connection: Arc<Mutex<Connection>>,
}

const TRANSACTION_COLUMNS: &str = "t.id, t.user_id, t.kind, t.amount, t.date, t.recurrence, \
     t.status, t.description, c.id, c.name, c.color, c.kind, c.user_id";

impl SqliteLedgerStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    /// Get a category by its ID.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `id` does not refer to a category, or
    /// [Error::SqlError] on an unexpected SQL error.
    pub fn get_category(&self, id: DatabaseID) -> Result<Category, Error> {
        self.connection
            .lock()
            .unwrap()
            .query_row(
                "SELECT id, name, color, kind, user_id FROM category WHERE id = ?1",
                (id,),
                Category::map_row,
            )
            .map_err(|error| error.into())
    }

    /// Create a new category in the database.
    ///
    /// `user_id` of `None` creates a system category visible to all users.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an unexpected SQL error.
    pub fn insert_category(
        &self,
        name: &str,
        color: &str,
        kind: Kind,
        user_id: Option<UserID>,
    ) -> Result<Category, Error> {
        let id = {
            let connection = self.connection.lock().unwrap();
            connection.query_row(
                "INSERT INTO category (name, color, kind, user_id)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id",
                (name, color, kind.as_str(), user_id.map(|id| id.as_i64())),
                |row| row.get(0),
            )?
        };

        Ok(Category {
            id,
            name: name.to_owned(),
            color: color.to_owned(),
            kind,
            user_id,
        })
    }

    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidCategory] if `new.category_id` does not refer to a valid category,
    /// - or [Error::SqlError] if there is some other SQL error.
    pub fn insert_transaction(&self, new: NewTransaction) -> Result<Transaction, Error> {
        let category = self.get_category(new.category_id).map_err(|error| {
            if error == Error::NotFound {
                Error::InvalidCategory
            } else {
                error
            }
        })?;

        let id = {
            let connection = self.connection.lock().unwrap();
            connection.query_row(
                "INSERT INTO \"transaction\"
                     (user_id, category_id, kind, amount, date, recurrence, status, description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 RETURNING id",
                (
                    new.user_id.as_i64(),
                    new.category_id,
                    new.kind.as_str(),
                    new.amount,
                    new.date,
                    new.recurrence.as_str(),
                    new.status.as_str(),
                    &new.description,
                ),
                |row| row.get(0),
            )?
        };

        Ok(Transaction::new(
            id,
            new.user_id,
            category,
            new.kind,
            new.amount,
            new.date,
            new.recurrence,
            new.status,
            new.description,
        ))
    }

    /// Create a new budget in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidCategory] if `category_id` does not refer to a valid category,
    /// - [Error::DuplicateBudget] if a budget already exists for the same
    ///   user, category, month and year,
    /// - or [Error::SqlError] if there is some other SQL error.
    pub fn insert_budget(
        &self,
        user_id: UserID,
        category_id: DatabaseID,
        month: Month,
        year: i32,
        limit: f64,
    ) -> Result<Budget, Error> {
        let category = self.get_category(category_id).map_err(|error| {
            if error == Error::NotFound {
                Error::InvalidCategory
            } else {
                error
            }
        })?;

        let id = {
            let connection = self.connection.lock().unwrap();
            connection.query_row(
                "INSERT INTO budget (user_id, category_id, month, year, \"limit\")
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING id",
                (
                    user_id.as_i64(),
                    category_id,
                    u8::from(month),
                    year,
                    limit,
                ),
                |row| row.get(0),
            )?
        };

        Ok(Budget {
            id,
            user_id,
            category,
            month,
            year,
            limit,
        })
    }
}

impl LedgerStore for SqliteLedgerStore {
    fn list_paid_transactions(
        &self,
        user_id: UserID,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>, Error> {
        let mut query_parameters = vec![
            Value::Integer(user_id.as_i64()),
            Value::Text(filter.date_up_to.to_string()),
        ];
        let mut where_clause_parts = vec![
            "t.user_id = ?1".to_string(),
            "t.status = 'PAID'".to_string(),
            "t.date <= ?2".to_string(),
        ];

        if let Some(kind) = filter.kind {
            where_clause_parts.push(format!("t.kind = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(kind.as_str().to_string()));
        }

        let query_string = format!(
            "SELECT {TRANSACTION_COLUMNS}
             FROM \"transaction\" t
             INNER JOIN category c ON c.id = t.category_id
             WHERE {}
             ORDER BY t.date ASC",
            where_clause_parts.join(" AND ")
        );

        self.connection
            .lock()
            .unwrap()
            .prepare(&query_string)?
            .query_map(params_from_iter(query_parameters.iter()), {
                Transaction::map_row
            })?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }

    fn list_budgets(
        &self,
        user_id: UserID,
        month: Month,
        year: i32,
    ) -> Result<Vec<Budget>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT b.id, b.user_id, b.month, b.year, b.\"limit\",
                        c.id, c.name, c.color, c.kind, c.user_id
                 FROM budget b
                 INNER JOIN category c ON c.id = b.category_id
                 WHERE b.user_id = ?1 AND b.month = ?2 AND b.year = ?3
                 ORDER BY b.id ASC",
            )?
            .query_map(
                (user_id.as_i64(), u8::from(month), year),
                Budget::map_row,
            )?
            .map(|maybe_budget| maybe_budget.map_err(Error::SqlError))
            .collect()
    }
}

/// The fields needed to store a new transaction.
#[derive(Clone, Debug)]
pub struct NewTransaction {
    /// The user that owns the transaction.
    pub user_id: UserID,
    /// The category the transaction belongs to.
    pub category_id: DatabaseID,
    /// Whether the transaction is an income or an expense.
    pub kind: Kind,
    /// The value of one occurrence, non-negative.
    pub amount: f64,
    /// The anchor date of the first (or only) occurrence.
    pub date: Date,
    /// The repetition rule.
    pub recurrence: Recurrence,
    /// Whether the transaction has settled.
    pub status: TransactionStatus,
    /// A text description of what the transaction was for.
    pub description: String,
}

impl CreateTable for Category {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE category (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                color TEXT NOT NULL,
                kind TEXT NOT NULL,
                user_id INTEGER
            )",
            (),
        )?;

        Ok(())
    }
}

impl CreateTable for Transaction {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE \"transaction\" (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                category_id INTEGER NOT NULL REFERENCES category(id),
                kind TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                recurrence TEXT NOT NULL,
                status TEXT NOT NULL,
                description TEXT NOT NULL
            )",
            (),
        )?;

        Ok(())
    }
}

impl CreateTable for Budget {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE budget (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                category_id INTEGER NOT NULL REFERENCES category(id),
                month INTEGER NOT NULL,
                year INTEGER NOT NULL,
                \"limit\" REAL NOT NULL,
                UNIQUE (user_id, category_id, month, year)
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for Category {
    type ReturnType = Self;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, rusqlite::Error> {
        Ok(Category {
            id: row.get(offset)?,
            name: row.get(offset + 1)?,
            color: row.get(offset + 2)?,
            kind: parse_enum_column(row, offset + 3)?,
            user_id: row
                .get::<_, Option<i64>>(offset + 4)?
                .map(UserID::new),
        })
    }
}

impl MapRow for Transaction {
    type ReturnType = Self;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, rusqlite::Error> {
        Ok(Transaction::new(
            row.get(offset)?,
            UserID::new(row.get(offset + 1)?),
            Category::map_row_with_offset(row, offset + 8)?,
            parse_enum_column(row, offset + 2)?,
            row.get(offset + 3)?,
            row.get(offset + 4)?,
            parse_enum_column(row, offset + 5)?,
            parse_enum_column(row, offset + 6)?,
            row.get(offset + 7)?,
        ))
    }
}

impl MapRow for Budget {
    type ReturnType = Self;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, rusqlite::Error> {
        let month_number: u8 = row.get(offset + 2)?;
        let month = Month::try_from(month_number).map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(
                offset + 2,
                rusqlite::types::Type::Integer,
                Box::new(error),
            )
        })?;

        Ok(Budget {
            id: row.get(offset)?,
            user_id: UserID::new(row.get(offset + 1)?),
            month,
            year: row.get(offset + 3)?,
            limit: row.get(offset + 4)?,
            category: Category::map_row_with_offset(row, offset + 5)?,
        })
    }
}

fn parse_enum_column<T>(row: &Row, index: usize) -> Result<T, rusqlite::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    row.get::<_, String>(index)?.parse().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            rusqlite::types::Type::Text,
            Box::new(error),
        )
    })
}
