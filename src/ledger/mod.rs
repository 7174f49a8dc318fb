//! Ledger collections, calendar helpers and the rent scheduler.

pub mod calendar;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod rent;

pub use ledger::Ledger;
pub use rent::{next_payable_month, rent_due, RentDue, MAX_SCAN_MONTHS};
