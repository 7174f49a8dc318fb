use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{new_record_id, Displayable, Identifiable};
use crate::ledger::calendar;

/// One rent or charge transaction. Only `Completed` payments count toward totals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Payment {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub tenant_name: String,
    pub amount: Decimal,
    pub concept: String,
    pub status: PaymentStatus,
    pub paid_at: DateTime<Utc>,
    /// Rent month this payment covers, independent of the concept text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<RentPeriod>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub settled_charge_ids: Vec<Uuid>,
}

impl Payment {
    pub fn completed(
        tenant_id: Uuid,
        tenant_name: impl Into<String>,
        amount: Decimal,
        concept: impl Into<String>,
        paid_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: new_record_id(),
            tenant_id,
            tenant_name: tenant_name.into(),
            amount,
            concept: concept.into(),
            status: PaymentStatus::Completed,
            paid_at,
            period: None,
            settled_charge_ids: Vec::new(),
        }
    }

    pub fn with_period(mut self, period: RentPeriod) -> Self {
        self.period = Some(period);
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == PaymentStatus::Completed
    }

    /// Whether this payment settles rent for the month starting at `month_start`.
    ///
    /// Records carrying a structured period are matched on it; older records fall
    /// back to the exact "Rent <Month> <Year>" concept prefix.
    pub fn covers_month(&self, month_start: NaiveDate) -> bool {
        if !self.is_completed() {
            return false;
        }
        match self.period {
            Some(period) => period == RentPeriod::containing(month_start),
            None => self.concept.starts_with(&calendar::rent_label(month_start)),
        }
    }
}

impl Identifiable for Payment {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Payment {
    fn display_label(&self) -> String {
        match self.period.and_then(|period| period.label()) {
            Some(label) => format!("{label}: {} {} [{:?}]", self.concept, self.amount, self.status),
            None => format!("{} {} [{:?}]", self.concept, self.amount, self.status),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Reverted,
}

/// Calendar month a rent payment is for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RentPeriod {
    pub year: i32,
    pub month: u32,
}

impl RentPeriod {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn label(&self) -> Option<String> {
        self.first_day().map(calendar::rent_label)
    }
}
