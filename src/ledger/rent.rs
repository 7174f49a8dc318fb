//! Determines which rent month is due from an arbitrary payment history.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::calendar;
use crate::domain::{Charge, Payment};

/// Twenty years of months; the scan gives up past this horizon.
pub const MAX_SCAN_MONTHS: usize = 240;

/// Returns the first month, starting at the month of `anchor`, that no completed
/// payment covers. `None` means nothing is due within the scan horizon.
///
/// Pure: reverted, failed and pending payments are ignored, and the same inputs
/// always yield the same month.
pub fn next_payable_month<'a>(
    payments: impl IntoIterator<Item = &'a Payment>,
    anchor: NaiveDate,
) -> Option<NaiveDate> {
    let completed: Vec<&Payment> = payments
        .into_iter()
        .filter(|payment| payment.is_completed())
        .collect();
    let mut month = calendar::first_day_of_month(anchor);
    for _ in 0..MAX_SCAN_MONTHS {
        if !completed.iter().any(|payment| payment.covers_month(month)) {
            return Some(month);
        }
        month = calendar::first_day_of_next_month(month)?;
    }
    tracing::debug!(%anchor, "rent scan exhausted its horizon");
    None
}

/// Rent owed for a month. Flat for every month; zero when no month is due.
pub fn amount_due_for_month(month: Option<NaiveDate>, monthly_rent: Decimal) -> Decimal {
    match month {
        Some(_) => monthly_rent,
        None => Decimal::ZERO,
    }
}

/// Sum of the charges still awaiting payment. Paid and deactivated charges are skipped.
pub fn pending_charges_total<'a>(charges: impl IntoIterator<Item = &'a Charge>) -> Decimal {
    charges
        .into_iter()
        .filter(|charge| charge.is_pending())
        .map(|charge| charge.amount)
        .sum()
}

/// What a tenant owes right now: the next rent month plus outstanding charges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RentDue {
    pub month: Option<NaiveDate>,
    pub label: Option<String>,
    pub rent: Decimal,
    pub charges: Decimal,
    pub total: Decimal,
}

impl RentDue {
    pub fn nothing_due(&self) -> bool {
        self.total.is_zero()
    }
}

pub fn rent_due<'a>(
    payments: impl IntoIterator<Item = &'a Payment>,
    charges: impl IntoIterator<Item = &'a Charge>,
    anchor: NaiveDate,
    monthly_rent: Decimal,
) -> RentDue {
    let month = next_payable_month(payments, anchor);
    let rent = amount_due_for_month(month, monthly_rent);
    let charges = pending_charges_total(charges);
    RentDue {
        month,
        label: month.map(calendar::rent_label),
        rent,
        charges,
        total: rent + charges,
    }
}
