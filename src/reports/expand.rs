//! Expands a transaction's recurrence rule into concrete occurrences.
//!
//! This is the one place recurrence stepping happens: every view sums or
//! enumerates the dates produced here, so the views cannot drift apart.

use time::{Date, Month};

use crate::{models::Transaction, reports::DateWindow};

/// The dates of all occurrences of `transaction` inside `window`, ascending.
///
/// A one-shot transaction yields its anchor date alone, if it is in the
/// window. A recurring transaction yields `anchor + k * period` for every
/// k ≥ 0 whose date lands in the window; each occurrence is computed from
/// the anchor, not from the previous occurrence, so a clamped short month
/// (e.g. Jan 31 → Feb 28) does not shift the dates of later occurrences.
///
/// The cost is linear in the number of periods elapsed between the anchor
/// and the window's end.
pub fn occurrence_dates(
    transaction: &Transaction,
    window: DateWindow,
) -> impl Iterator<Item = Date> + use<> {
    let anchor = transaction.date();
    let period_months = transaction.recurrence().period_months();

    (0u32..)
        .map_while(move |k| match (k, period_months) {
            (0, _) => Some(anchor),
            (_, None) => None,
            // Dates past the calendar's representable range cannot be in
            // the window either, so stop expanding there.
            (_, Some(months)) => add_months(anchor, k * months as u32),
        })
        .take_while(move |occurrence| *occurrence <= window.end())
        .filter(move |occurrence| *occurrence >= window.start())
}

/// The summed value of all occurrences of `transaction` inside `window`.
///
/// Every occurrence carries the transaction's full amount; there is no
/// proration. The sum is unsigned regardless of the transaction's kind.
pub fn occurrence_sum(transaction: &Transaction, window: DateWindow) -> f64 {
    transaction.amount() * occurrence_dates(transaction, window).count() as f64
}

/// `date` moved forward by `months` calendar months, preserving the
/// day-of-month where the target month is long enough and clamping to the
/// target month's last day otherwise.
///
/// Returns `None` when the result falls outside the representable calendar
/// range.
fn add_months(date: Date, months: u32) -> Option<Date> {
    let total = date.year() as i64 * 12 + (u8::from(date.month()) as i64 - 1) + months as i64;
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    // The remainder is always in 0..=11, so the conversion cannot fail.
    let month = Month::try_from((total.rem_euclid(12) + 1) as u8).unwrap();
    let day = date.day().min(month.length(year));

    Date::from_calendar_date(year, month, day).ok()
}
