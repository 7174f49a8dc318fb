//! Calendar helpers for monthly rent periods and their human labels.
//!
//! Labels are always rendered with English month names (`%B`), so a label
//! produced when a payment is recorded matches the label the scheduler
//! looks for later regardless of the host locale.

use chrono::{DateTime, Datelike, Duration, Month, Months, NaiveDate, Utc};

const RENT_PREFIX: &str = "Rent";
const MONTH_YEAR_FORMAT: &str = "%B %Y";
const DAY_LABEL_FORMAT: &str = "%B %-d, %Y";

/// Returns the first day of the month containing `date`.
pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.day0() as i64)
}

/// Returns the first day of the month after the one containing `date`.
///
/// `None` only at the upper bound of the representable calendar.
pub fn first_day_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    first_day_of_month(date).checked_add_months(Months::new(1))
}

/// Moves `date` by a signed number of months, clamping the day to the target month.
pub fn shift_month(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let magnitude = Months::new(months.unsigned_abs());
    if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    }
}

/// "January 2025".
pub fn month_year_label(date: NaiveDate) -> String {
    date.format(MONTH_YEAR_FORMAT).to_string()
}

/// "Rent January 2025", the concept label of a rent payment for that month.
pub fn rent_label(date: NaiveDate) -> String {
    format!("{RENT_PREFIX} {}", month_year_label(date))
}

/// "March 4, 2025", used for charge assignment and submission dates.
pub fn day_label(instant: DateTime<Utc>) -> String {
    instant.format(DAY_LABEL_FORMAT).to_string()
}

/// Parses the leading "Rent <Month> <Year>" of a concept back into the first day of
/// that month. Trailing text (for example a list of settled charges) is ignored.
pub fn parse_rent_label(label: &str) -> Option<NaiveDate> {
    let mut words = label.split_whitespace();
    if words.next()? != RENT_PREFIX {
        return None;
    }
    let month: Month = words.next()?.parse().ok()?;
    let year: i32 = words.next()?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month.number_from_month(), 1)
}

/// Whether both dates fall in the same calendar month.
pub fn same_month(left: NaiveDate, right: NaiveDate) -> bool {
    left.year() == right.year() && left.month() == right.month()
}
