//! Fluxo is a personal-finance backend built around a recurring-transaction
//! aggregation engine.
//!
//! Transactions are stored once, with a recurrence rule (none, monthly,
//! quarterly or annual) anchored at their first occurrence date. The
//! [reports] module expands those rules on demand to compute balances,
//! monthly totals, category breakdowns, budget alerts and calendar events,
//! all from the same expansion logic so the views cannot disagree.
//!
//! The engine reads everything through the [stores::LedgerStore] trait and
//! never writes; a SQLite implementation is provided. A thin JSON API in
//! `routes` exposes the read operations.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use time::Date;
use tokio::signal;

mod app_state;
pub mod db;
mod endpoints;
pub mod models;
pub mod reports;
mod routes;
pub mod stores;

pub use app_state::AppState;
pub use routes::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A month number outside 1..=12 was given.
    #[error("{0} is not a valid month number, expected a value between 1 and 12")]
    InvalidMonth(u8),

    /// A year that does not map to a representable calendar date was given.
    #[error("{0} is not a valid year")]
    InvalidYear(i32),

    /// A date range where the start comes after the end was given.
    #[error("invalid date range: the start date {start} is after the end date {end}")]
    InvalidDateRange {
        /// The start of the offending range.
        start: Date,
        /// The end of the offending range.
        end: Date,
    },

    /// A trend series of zero months was requested.
    #[error("the month count must be at least one")]
    InvalidMonthCount,

    /// The category ID used to create a transaction or budget did not match
    /// a valid category.
    #[error("the category ID does not refer to a valid category")]
    InvalidCategory,

    /// A budget already exists for the same user, category, month and year.
    #[error("a budget for this category and period already exists")]
    DuplicateBudget,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// A concurrently executed sub-computation was cancelled or panicked.
    #[error("a sub-computation failed to complete: {0}")]
    TaskFailure(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_)) if sql_error.extended_code == 787 => {
                Error::InvalidCategory
            }
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("budget") =>
            {
                Error::DuplicateBudget
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidMonth(_)
            | Error::InvalidYear(_)
            | Error::InvalidDateRange { .. }
            | Error::InvalidMonthCount => {
                error_body(StatusCode::BAD_REQUEST, "INVALID_ARGUMENT", &self)
            }
            Error::InvalidCategory => error_body(StatusCode::BAD_REQUEST, "NOT_FOUND", &self),
            Error::DuplicateBudget => error_body(StatusCode::CONFLICT, "CONFLICT", &self),
            Error::NotFound => error_body(StatusCode::NOT_FOUND, "NOT_FOUND", &self),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                error_body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    &"an internal error occurred",
                )
            }
        }
    }
}

fn error_body(status: StatusCode, code: &str, message: &dyn std::fmt::Display) -> Response {
    (
        status,
        Json(json!({ "error": { "code": code, "message": message.to_string() } })),
    )
        .into_response()
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use time::macros::date;

    use crate::Error;

    #[tokio::test]
    async fn invalid_range_maps_to_bad_request() {
        let error = Error::InvalidDateRange {
            start: date!(2025 - 05 - 01),
            end: date!(2025 - 04 - 01),
        };

        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"]["code"], "INVALID_ARGUMENT");
    }

    #[test]
    fn missing_rows_map_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();
        assert_eq!(error, Error::NotFound);
    }
}
