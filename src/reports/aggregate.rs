//! The combined dashboard response: summary, category breakdown, trend
//! series and budget statuses computed concurrently.

use serde::Serialize;
use time::{Date, Month};

use crate::{
    Error,
    models::UserID,
    reports::{
        budgets::{self, BudgetStatus},
        totals::{self, CategorySpend},
        trend::{self, MonthSummary, MonthlyPoint},
    },
    stores::LedgerStore,
};

/// The default number of months in the aggregated view's trend series.
pub const DEFAULT_TREND_MONTHS: u32 = 12;

/// Everything the dashboard needs in one response.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedReport {
    /// Headline figures for the queried month.
    pub summary: MonthSummary,
    /// Expense totals per category for the queried month, descending.
    pub expenses_by_category: Vec<CategorySpend>,
    /// Trend series ending at today's month, oldest first.
    pub monthly_evolution: Vec<MonthlyPoint>,
    /// Utilization of the budgets stored for the queried month.
    pub budget_status: Vec<BudgetStatus>,
}

/// Computes the four dashboard sections for `(month, year)` and combines
/// them into one response.
///
/// The sections are read-only and independent, so they run concurrently;
/// the call's latency is bounded by the slowest section rather than their
/// sum. If any section fails the whole call fails; there is no
/// partial-result mode. The trend series is anchored at `today`'s month
/// with `month_count` months, like the standalone evolution endpoint.
///
/// # Errors
/// Returns the first section error, or [Error::TaskFailure] if a section
/// task was cancelled or panicked.
pub async fn aggregated<S>(
    store: &S,
    user_id: UserID,
    month: Month,
    year: i32,
    month_count: u32,
    today: Date,
) -> Result<AggregatedReport, Error>
where
    S: LedgerStore + Clone + Send + 'static,
{
    let summary_task = tokio::task::spawn_blocking({
        let store = store.clone();
        move || trend::month_summary(&store, user_id, month, year, today)
    });
    let spending_task = tokio::task::spawn_blocking({
        let store = store.clone();
        move || totals::expenses_by_category(&store, user_id, month, year)
    });
    let evolution_task = tokio::task::spawn_blocking({
        let store = store.clone();
        move || {
            trend::monthly_evolution(&store, user_id, today.month(), today.year(), month_count, today)
        }
    });
    let budgets_task = tokio::task::spawn_blocking({
        let store = store.clone();
        move || budgets::budget_status(&store, user_id, month, year)
    });

    let (summary, expenses_by_category, monthly_evolution, budget_status) =
        tokio::try_join!(summary_task, spending_task, evolution_task, budgets_task)
            .map_err(|error| Error::TaskFailure(error.to_string()))?;

    Ok(AggregatedReport {
        summary: summary?,
        expenses_by_category: expenses_by_category?,
        monthly_evolution: monthly_evolution?,
        budget_status: budget_status?,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::{Month, macros::date};

    use crate::{
        Error,
        db::initialize,
        models::{Budget, Kind, Recurrence, Transaction, TransactionStatus, UserID},
        reports::{budget_status, expenses_by_category, month_summary, monthly_evolution},
        stores::{LedgerStore, SqliteLedgerStore, TransactionFilter, sqlite::NewTransaction},
    };

    use super::aggregated;

    fn get_test_store() -> SqliteLedgerStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        SqliteLedgerStore::new(Arc::new(Mutex::new(connection)))
    }

    fn seed(store: &SqliteLedgerStore, user_id: UserID) {
        let salary = store
            .insert_category("Salário", "#22C55E", Kind::Income, None)
            .unwrap();
        let rent = store
            .insert_category("Moradia", "#EF4444", Kind::Expense, None)
            .unwrap();

        store
            .insert_transaction(NewTransaction {
                user_id,
                category_id: salary.id,
                kind: Kind::Income,
                amount: 3000.0,
                date: date!(2025 - 01 - 01),
                recurrence: Recurrence::Monthly,
                status: TransactionStatus::Paid,
                description: "salary".to_owned(),
            })
            .unwrap();
        store
            .insert_transaction(NewTransaction {
                user_id,
                category_id: rent.id,
                kind: Kind::Expense,
                amount: 900.0,
                date: date!(2025 - 01 - 05),
                recurrence: Recurrence::Monthly,
                status: TransactionStatus::Paid,
                description: "rent".to_owned(),
            })
            .unwrap();
        store
            .insert_budget(user_id, rent.id, Month::March, 2025, 1000.0)
            .unwrap();
    }

    #[tokio::test]
    async fn sections_agree_with_standalone_computations() {
        let store = get_test_store();
        let user_id = UserID::new(1);
        seed(&store, user_id);
        let today = date!(2025 - 03 - 20);

        let report = aggregated(&store, user_id, Month::March, 2025, 3, today)
            .await
            .unwrap();

        assert_eq!(
            report.summary,
            month_summary(&store, user_id, Month::March, 2025, today).unwrap()
        );
        assert_eq!(
            report.expenses_by_category,
            expenses_by_category(&store, user_id, Month::March, 2025).unwrap()
        );
        assert_eq!(
            report.monthly_evolution,
            monthly_evolution(&store, user_id, Month::March, 2025, 3, today).unwrap()
        );
        assert_eq!(
            report.budget_status,
            budget_status(&store, user_id, Month::March, 2025).unwrap()
        );
        assert_eq!(report.monthly_evolution.len(), 3);
    }

    /// A store whose budget query always fails, for exercising the
    /// no-partial-results rule.
    #[derive(Clone)]
    struct BrokenBudgetStore {
        inner: SqliteLedgerStore,
    }

    impl LedgerStore for BrokenBudgetStore {
        fn list_paid_transactions(
            &self,
            user_id: UserID,
            filter: TransactionFilter,
        ) -> Result<Vec<Transaction>, Error> {
            self.inner.list_paid_transactions(user_id, filter)
        }

        fn list_budgets(
            &self,
            _user_id: UserID,
            _month: Month,
            _year: i32,
        ) -> Result<Vec<Budget>, Error> {
            Err(Error::SqlError(rusqlite::Error::InvalidQuery))
        }
    }

    #[tokio::test]
    async fn one_failing_section_fails_the_whole_call() {
        let store = get_test_store();
        let user_id = UserID::new(1);
        seed(&store, user_id);

        let broken = BrokenBudgetStore { inner: store };
        let result = aggregated(
            &broken,
            user_id,
            Month::March,
            2025,
            3,
            date!(2025 - 03 - 20),
        )
        .await;

        assert_eq!(
            result,
            Err(Error::SqlError(rusqlite::Error::InvalidQuery))
        );
    }

    #[tokio::test]
    async fn zero_trend_months_fails_the_whole_call() {
        let store = get_test_store();
        let user_id = UserID::new(1);
        seed(&store, user_id);

        let result = aggregated(
            &store,
            user_id,
            Month::March,
            2025,
            0,
            date!(2025 - 03 - 20),
        )
        .await;

        assert_eq!(result, Err(Error::InvalidMonthCount));
    }
}
