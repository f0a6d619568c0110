//! This file defines the API routes and their handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use time::{Month, OffsetDateTime};

use crate::{
    AppState, Error, endpoints,
    models::{Kind, UserID},
    reports::{
        AggregatedReport, BudgetStatus, CalendarEvent, CategorySpend, DEFAULT_TREND_MONTHS,
        DateWindow, MonthSummary, MonthlyPoint, aggregated, budget_status, calendar_events,
        expenses_by_category, month_summary, monthly_evolution,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::SUMMARY, get(get_summary))
        .route(
            endpoints::EXPENSES_BY_CATEGORY,
            get(get_expenses_by_category),
        )
        .route(endpoints::MONTHLY_EVOLUTION, get(get_monthly_evolution))
        .route(endpoints::BUDGETS_STATUS, get(get_budgets_status))
        .route(endpoints::AGGREGATED, get(get_aggregated))
        .route(endpoints::CALENDAR, get(get_calendar))
        .route(endpoints::HEALTH, get(get_health))
        .with_state(state)
}

/// Query parameters naming a user and a calendar month.
#[derive(Debug, Deserialize)]
struct PeriodParams {
    user_id: UserID,
    month: u8,
    year: i32,
}

impl PeriodParams {
    /// Parse the month number into a calendar month.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if the number is outside 1 to 12.
    fn month(&self) -> Result<Month, Error> {
        Month::try_from(self.month).map_err(|_| Error::InvalidMonth(self.month))
    }
}

/// Query parameters for the aggregated endpoint.
#[derive(Debug, Deserialize)]
struct AggregatedParams {
    user_id: UserID,
    month: u8,
    year: i32,
    #[serde(default = "default_trend_months")]
    months: u32,
}

impl AggregatedParams {
    fn month(&self) -> Result<Month, Error> {
        Month::try_from(self.month).map_err(|_| Error::InvalidMonth(self.month))
    }
}

fn default_trend_months() -> u32 {
    DEFAULT_TREND_MONTHS
}

/// Query parameters for the trend series endpoint, which is always anchored
/// at today's month.
#[derive(Debug, Deserialize)]
struct EvolutionParams {
    user_id: UserID,
    #[serde(default = "default_trend_months")]
    months: u32,
}

/// Query parameters for the calendar endpoint.
#[derive(Debug, Deserialize)]
struct CalendarParams {
    user_id: UserID,
    date_from: time::Date,
    date_to: time::Date,
    kind: Option<Kind>,
}

/// A route handler for the current month's headline figures.
async fn get_summary(
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> Result<Json<MonthSummary>, Error> {
    let today = OffsetDateTime::now_utc().date();
    let summary = month_summary(&state.store, params.user_id, params.month()?, params.year, today)?;

    Ok(Json(summary))
}

/// A route handler for the per-category expense breakdown.
async fn get_expenses_by_category(
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> Result<Json<Vec<CategorySpend>>, Error> {
    let breakdown =
        expenses_by_category(&state.store, params.user_id, params.month()?, params.year)?;

    Ok(Json(breakdown))
}

/// A route handler for the month-by-month trend series.
async fn get_monthly_evolution(
    State(state): State<AppState>,
    Query(params): Query<EvolutionParams>,
) -> Result<Json<Vec<MonthlyPoint>>, Error> {
    let today = OffsetDateTime::now_utc().date();
    let series = monthly_evolution(
        &state.store,
        params.user_id,
        today.month(),
        today.year(),
        params.months,
        today,
    )?;

    Ok(Json(series))
}

/// A route handler for budget utilization and alerts.
async fn get_budgets_status(
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> Result<Json<Vec<BudgetStatus>>, Error> {
    let statuses = budget_status(&state.store, params.user_id, params.month()?, params.year)?;

    Ok(Json(statuses))
}

/// A route handler for the combined dashboard response.
async fn get_aggregated(
    State(state): State<AppState>,
    Query(params): Query<AggregatedParams>,
) -> Result<Json<AggregatedReport>, Error> {
    let today = OffsetDateTime::now_utc().date();
    let report = aggregated(
        &state.store,
        params.user_id,
        params.month()?,
        params.year,
        params.months,
        today,
    )
    .await?;

    Ok(Json(report))
}

/// A route handler for calendar events within a date range.
async fn get_calendar(
    State(state): State<AppState>,
    Query(params): Query<CalendarParams>,
) -> Result<Json<Vec<CalendarEvent>>, Error> {
    let window = DateWindow::new(params.date_from, params.date_to)?;
    let events = calendar_events(&state.store, params.user_id, window, params.kind)?;

    Ok(Json(events))
}

/// A route handler for the liveness check.
async fn get_health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod route_tests {
    use std::sync::{Arc, Mutex};

    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::Value;
    use time::{Month, OffsetDateTime, macros::date};

    use crate::{
        AppState, build_router,
        db::initialize,
        endpoints,
        models::{Kind, Recurrence, TransactionStatus, UserID},
        stores::{SqliteLedgerStore, sqlite::NewTransaction},
    };

    fn get_test_server() -> (TestServer, SqliteLedgerStore) {
        let connection = Connection::open_in_memory().expect("Could not open database in memory.");
        initialize(&connection).expect("Could not initialize database.");

        let store = SqliteLedgerStore::new(Arc::new(Mutex::new(connection)));
        let app = build_router(AppState::new(store.clone()));
        let server = TestServer::new(app);

        (server, store)
    }

    fn seed_ledger(store: &SqliteLedgerStore, user_id: UserID) {
        let salary = store
            .insert_category("Salário", "#22C55E", Kind::Income, None)
            .unwrap();
        let housing = store
            .insert_category("Moradia", "#EF4444", Kind::Expense, None)
            .unwrap();

        store
            .insert_transaction(NewTransaction {
                user_id,
                category_id: salary.id,
                kind: Kind::Income,
                amount: 3000.0,
                date: date!(2024 - 01 - 01),
                recurrence: Recurrence::Monthly,
                status: TransactionStatus::Paid,
                description: "salary".to_owned(),
            })
            .unwrap();
        store
            .insert_transaction(NewTransaction {
                user_id,
                category_id: housing.id,
                kind: Kind::Expense,
                amount: 900.0,
                date: date!(2024 - 01 - 05),
                recurrence: Recurrence::Monthly,
                status: TransactionStatus::Paid,
                description: "rent".to_owned(),
            })
            .unwrap();
        store
            .insert_budget(user_id, housing.id, Month::March, 2025, 1000.0)
            .unwrap();
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (server, _) = get_test_server();

        let response = server.get(endpoints::HEALTH).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "ok");
    }

    #[tokio::test]
    async fn summary_returns_month_figures() {
        let (server, store) = get_test_server();
        seed_ledger(&store, UserID::new(1));

        let response = server
            .get(endpoints::SUMMARY)
            .add_query_param("user_id", 1)
            .add_query_param("month", 3)
            .add_query_param("year", 2025)
            .await;

        response.assert_status_ok();

        let summary = response.json::<Value>();
        assert_eq!(summary["income"], 3000.0);
        assert_eq!(summary["expenses"], 900.0);
    }

    #[tokio::test]
    async fn summary_rejects_invalid_month() {
        let (server, _) = get_test_server();

        let response = server
            .get(endpoints::SUMMARY)
            .add_query_param("user_id", 1)
            .add_query_param("month", 13)
            .add_query_param("year", 2025)
            .await;

        response.assert_status_bad_request();
        assert_eq!(
            response.json::<Value>()["error"]["code"],
            "INVALID_ARGUMENT"
        );
    }

    #[tokio::test]
    async fn expense_breakdown_lists_active_categories() {
        let (server, store) = get_test_server();
        seed_ledger(&store, UserID::new(1));

        let response = server
            .get(endpoints::EXPENSES_BY_CATEGORY)
            .add_query_param("user_id", 1)
            .add_query_param("month", 3)
            .add_query_param("year", 2025)
            .await;

        response.assert_status_ok();

        let breakdown = response.json::<Vec<Value>>();
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0]["name"], "Moradia");
        assert_eq!(breakdown[0]["total"], 900.0);
    }

    #[tokio::test]
    async fn evolution_defaults_to_twelve_months() {
        let (server, store) = get_test_server();
        seed_ledger(&store, UserID::new(1));

        let response = server
            .get(endpoints::MONTHLY_EVOLUTION)
            .add_query_param("user_id", 1)
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Value>>().len(), 12);
    }

    #[tokio::test]
    async fn budgets_status_reports_utilization() {
        let (server, store) = get_test_server();
        seed_ledger(&store, UserID::new(1));

        let response = server
            .get(endpoints::BUDGETS_STATUS)
            .add_query_param("user_id", 1)
            .add_query_param("month", 3)
            .add_query_param("year", 2025)
            .await;

        response.assert_status_ok();

        let statuses = response.json::<Vec<Value>>();
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0]["spent"], 900.0);
        assert_eq!(statuses[0]["alert"], "warning");
    }

    #[tokio::test]
    async fn aggregated_returns_all_sections() {
        let (server, store) = get_test_server();
        seed_ledger(&store, UserID::new(1));

        let response = server
            .get(endpoints::AGGREGATED)
            .add_query_param("user_id", 1)
            .add_query_param("month", 3)
            .add_query_param("year", 2025)
            .add_query_param("months", 6)
            .await;

        response.assert_status_ok();

        let report = response.json::<Value>();
        assert!(report["summary"].is_object());
        assert!(report["expensesByCategory"].is_array());
        assert_eq!(report["monthlyEvolution"].as_array().unwrap().len(), 6);
        assert!(report["budgetStatus"].is_array());
    }

    #[tokio::test]
    async fn calendar_expands_occurrences_in_range() {
        let (server, store) = get_test_server();
        seed_ledger(&store, UserID::new(1));

        let response = server
            .get(endpoints::CALENDAR)
            .add_query_param("user_id", 1)
            .add_query_param("date_from", "2025-03-01")
            .add_query_param("date_to", "2025-03-31")
            .await;

        response.assert_status_ok();

        let events = response.json::<Vec<Value>>();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["date"], "2025-03-01");
        assert_eq!(events[0]["transaction"]["kind"], "INCOME");
        assert_eq!(events[1]["date"], "2025-03-05");
    }

    #[tokio::test]
    async fn calendar_filters_by_kind() {
        let (server, store) = get_test_server();
        seed_ledger(&store, UserID::new(1));

        let response = server
            .get(endpoints::CALENDAR)
            .add_query_param("user_id", 1)
            .add_query_param("date_from", "2025-03-01")
            .add_query_param("date_to", "2025-03-31")
            .add_query_param("kind", "EXPENSE")
            .await;

        response.assert_status_ok();

        let events = response.json::<Vec<Value>>();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["transaction"]["kind"], "EXPENSE");
    }

    #[tokio::test]
    async fn calendar_rejects_inverted_range() {
        let (server, _) = get_test_server();

        let response = server
            .get(endpoints::CALENDAR)
            .add_query_param("user_id", 1)
            .add_query_param("date_from", "2025-03-31")
            .add_query_param("date_to", "2025-03-01")
            .await;

        response.assert_status_bad_request();
        assert_eq!(
            response.json::<Value>()["error"]["code"],
            "INVALID_ARGUMENT"
        );
    }

    #[tokio::test]
    async fn summary_balance_includes_occurrences_up_to_today() {
        let (server, store) = get_test_server();
        seed_ledger(&store, UserID::new(1));

        let today = OffsetDateTime::now_utc().date();
        let response = server
            .get(endpoints::SUMMARY)
            .add_query_param("user_id", 1)
            .add_query_param("month", today.month() as u8)
            .add_query_param("year", today.year())
            .await;

        response.assert_status_ok();

        // 2100 net per month since January 2024, paid on the 1st and 5th.
        let summary = response.json::<Value>();
        assert!(summary["balance"].as_f64().unwrap() > 0.0);
    }
}
