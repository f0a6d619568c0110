//! Read-only views computed from the stored ledger.
//!
//! Every view in this module is built on the same recurrence expansion
//! ([expand]): point-in-time balances ([balance]), per-month totals and
//! category breakdowns ([totals]), month summaries and trend series
//! ([trend]), budget alerts ([budgets]), calendar events ([calendar]) and
//! the combined dashboard response ([aggregate]).
//!
//! All computations are pure functions of the store snapshot and their
//! explicit arguments; "today" is always passed in, never read from the
//! clock, so every view is deterministic and testable.

use time::{Date, Month};

use crate::Error;

pub mod aggregate;
pub mod balance;
pub mod budgets;
pub mod calendar;
pub mod expand;
pub mod totals;
pub mod trend;

pub use aggregate::{AggregatedReport, DEFAULT_TREND_MONTHS, aggregated};
pub use balance::balance_as_of;
pub use budgets::{AlertLevel, BudgetStatus, budget_status};
pub use calendar::{CalendarEvent, calendar_events};
pub use totals::{CategorySpend, MonthTotals, expenses_by_category, month_totals};
pub use trend::{MonthSummary, MonthlyPoint, month_summary, monthly_evolution};

/// A closed date range, inclusive at both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateWindow {
    start: Date,
    end: Date,
}

impl DateWindow {
    /// Create a window spanning `[start, end]`.
    ///
    /// # Errors
    /// Returns [Error::InvalidDateRange] if `start` is after `end`.
    pub fn new(start: Date, end: Date) -> Result<Self, Error> {
        if start > end {
            return Err(Error::InvalidDateRange { start, end });
        }

        Ok(Self { start, end })
    }

    /// Create a window spanning everything up to and including `end`.
    pub fn up_to(end: Date) -> Self {
        Self {
            start: Date::MIN,
            end,
        }
    }

    /// Create a window spanning one calendar month.
    ///
    /// # Errors
    /// Returns [Error::InvalidYear] if the year is outside the representable
    /// calendar range.
    pub fn month_of(month: Month, year: i32) -> Result<Self, Error> {
        let start =
            Date::from_calendar_date(year, month, 1).map_err(|_| Error::InvalidYear(year))?;
        let end = Date::from_calendar_date(year, month, month.length(year))
            .map_err(|_| Error::InvalidYear(year))?;

        Ok(Self { start, end })
    }

    /// The first date inside the window.
    pub fn start(&self) -> Date {
        self.start
    }

    /// The last date inside the window.
    pub fn end(&self) -> Date {
        self.end
    }

    /// Whether `date` falls inside the window.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The calendar month immediately before `(month, year)`, crossing the year
/// boundary when needed.
pub(crate) fn previous_month(month: Month, year: i32) -> (Month, i32) {
    match month {
        Month::January => (Month::December, year - 1),
        month => (month.previous(), year),
    }
}

/// The calendar month `offset` months before `(month, year)`.
pub(crate) fn months_before(month: Month, year: i32, offset: u32) -> (Month, i32) {
    let total = year as i64 * 12 + (u8::from(month) as i64 - 1) - offset as i64;
    let year = total.div_euclid(12) as i32;
    // The remainder is always in 0..=11, so the conversion cannot fail.
    let month = Month::try_from((total.rem_euclid(12) + 1) as u8).unwrap();

    (month, year)
}
