//! Materializes recurrence occurrences as calendar events for display.

use serde::Serialize;
use time::Date;

use crate::{
    Error,
    models::{Kind, Transaction, UserID},
    reports::{DateWindow, expand},
    stores::{LedgerStore, TransactionFilter},
};

/// One occurrence of a transaction on the calendar.
///
/// A recurring transaction appears once per occurrence inside the queried
/// range, each event carrying the full transaction record.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CalendarEvent {
    /// The calendar date of this occurrence.
    pub date: Date,
    /// The transaction that produced the occurrence.
    pub transaction: Transaction,
}

/// All occurrences of the user's paid transactions inside `window`, sorted
/// ascending by occurrence date, optionally restricted to one kind.
///
/// Events on the same date keep the order their transactions were returned
/// by the store (anchor date ascending); no further tie order is
/// guaranteed.
///
/// # Errors
/// Propagates store errors unchanged.
pub fn calendar_events<S: LedgerStore>(
    store: &S,
    user_id: UserID,
    window: DateWindow,
    kind: Option<Kind>,
) -> Result<Vec<CalendarEvent>, Error> {
    let filter = TransactionFilter {
        kind,
        date_up_to: window.end(),
    };
    let transactions = store.list_paid_transactions(user_id, filter)?;

    let mut events = Vec::new();
    for transaction in &transactions {
        for date in expand::occurrence_dates(transaction, window) {
            events.push(CalendarEvent {
                date,
                transaction: transaction.clone(),
            });
        }
    }

    events.sort_by_key(|event| event.date);

    Ok(events)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        db::initialize,
        models::{Kind, Recurrence, TransactionStatus, UserID},
        reports::DateWindow,
        stores::{SqliteLedgerStore, sqlite::NewTransaction},
    };

    use super::calendar_events;

    fn get_test_store() -> SqliteLedgerStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        SqliteLedgerStore::new(Arc::new(Mutex::new(connection)))
    }

    fn insert(
        store: &SqliteLedgerStore,
        kind: Kind,
        amount: f64,
        anchor: Date,
        recurrence: Recurrence,
        status: TransactionStatus,
        description: &str,
    ) {
        let category = store
            .insert_category("Test", "#6B7280", kind, None)
            .unwrap();
        store
            .insert_transaction(NewTransaction {
                user_id: UserID::new(1),
                category_id: category.id,
                kind,
                amount,
                date: anchor,
                recurrence,
                status,
                description: description.to_owned(),
            })
            .unwrap();
    }

    #[test]
    fn recurring_transaction_appears_once_per_occurrence() {
        let store = get_test_store();
        insert(
            &store,
            Kind::Expense,
            45.0,
            date!(2025 - 01 - 07),
            Recurrence::Monthly,
            TransactionStatus::Paid,
            "internet",
        );

        let window = DateWindow::new(date!(2025 - 01 - 01), date!(2025 - 03 - 31)).unwrap();
        let events = calendar_events(&store, UserID::new(1), window, None).unwrap();

        let dates: Vec<_> = events.iter().map(|event| event.date).collect();
        assert_eq!(
            dates,
            vec![
                date!(2025 - 01 - 07),
                date!(2025 - 02 - 07),
                date!(2025 - 03 - 07),
            ]
        );
        assert!(
            events
                .iter()
                .all(|event| event.transaction.description() == "internet")
        );
    }

    #[test]
    fn events_merge_sorted_across_transactions() {
        let store = get_test_store();
        insert(
            &store,
            Kind::Expense,
            45.0,
            date!(2025 - 01 - 20),
            Recurrence::Monthly,
            TransactionStatus::Paid,
            "phone",
        );
        insert(
            &store,
            Kind::Income,
            3000.0,
            date!(2025 - 01 - 05),
            Recurrence::Monthly,
            TransactionStatus::Paid,
            "salary",
        );

        let window = DateWindow::new(date!(2025 - 01 - 01), date!(2025 - 02 - 28)).unwrap();
        let events = calendar_events(&store, UserID::new(1), window, None).unwrap();

        let dates: Vec<_> = events.iter().map(|event| event.date).collect();
        assert_eq!(
            dates,
            vec![
                date!(2025 - 01 - 05),
                date!(2025 - 01 - 20),
                date!(2025 - 02 - 05),
                date!(2025 - 02 - 20),
            ]
        );
    }

    #[test]
    fn kind_filter_and_status_are_applied() {
        let store = get_test_store();
        insert(
            &store,
            Kind::Expense,
            45.0,
            date!(2025 - 01 - 10),
            Recurrence::None,
            TransactionStatus::Paid,
            "paid expense",
        );
        insert(
            &store,
            Kind::Income,
            100.0,
            date!(2025 - 01 - 12),
            Recurrence::None,
            TransactionStatus::Paid,
            "paid income",
        );
        insert(
            &store,
            Kind::Income,
            100.0,
            date!(2025 - 01 - 15),
            Recurrence::None,
            TransactionStatus::Pending,
            "pending income",
        );

        let window = DateWindow::new(date!(2025 - 01 - 01), date!(2025 - 01 - 31)).unwrap();
        let events =
            calendar_events(&store, UserID::new(1), window, Some(Kind::Income)).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].transaction.description(), "paid income");
    }
}
