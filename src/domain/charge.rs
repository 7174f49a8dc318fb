use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{new_record_id, Displayable, Identifiable};
use crate::ledger::calendar;

/// A one-off debt assigned by the manager, independent of rent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Charge {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub tenant_name: String,
    pub amount: Decimal,
    pub concept: String,
    pub status: ChargeStatus,
    pub assigned_at: DateTime<Utc>,
    /// Payment that settled this charge; set once the charge is `Paid`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<Uuid>,
}

impl Charge {
    pub fn pending(
        tenant_id: Uuid,
        tenant_name: impl Into<String>,
        amount: Decimal,
        concept: impl Into<String>,
        assigned_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: new_record_id(),
            tenant_id,
            tenant_name: tenant_name.into(),
            amount,
            concept: concept.into(),
            status: ChargeStatus::Pending,
            assigned_at,
            payment_id: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ChargeStatus::Pending
    }

    pub fn date_assigned_label(&self) -> String {
        calendar::day_label(self.assigned_at)
    }

    pub fn mark_paid(&mut self, payment_id: Uuid) {
        self.status = ChargeStatus::Paid;
        self.payment_id = Some(payment_id);
    }
}

impl Identifiable for Charge {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Charge {
    fn display_label(&self) -> String {
        format!("{} {} [{:?}]", self.concept, self.amount, self.status)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChargeStatus {
    Pending,
    Paid,
    Deactivated,
}

impl ChargeStatus {
    /// Transitions a manager may request directly. `Pending -> Paid` happens only
    /// when a payment settles the charge.
    pub fn can_set(self, target: ChargeStatus) -> bool {
        matches!(
            (self, target),
            (ChargeStatus::Pending, ChargeStatus::Deactivated)
                | (ChargeStatus::Deactivated, ChargeStatus::Pending)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pending_and_deactivated_swap_directly() {
        assert!(ChargeStatus::Pending.can_set(ChargeStatus::Deactivated));
        assert!(ChargeStatus::Deactivated.can_set(ChargeStatus::Pending));
        assert!(!ChargeStatus::Pending.can_set(ChargeStatus::Paid));
        assert!(!ChargeStatus::Paid.can_set(ChargeStatus::Deactivated));
        assert!(!ChargeStatus::Deactivated.can_set(ChargeStatus::Paid));
        assert!(!ChargeStatus::Paid.can_set(ChargeStatus::Pending));
    }

    #[test]
    fn settling_links_the_payment() {
        use chrono::TimeZone;

        let assigned_at = Utc.with_ymd_and_hms(2025, 4, 7, 16, 45, 0).unwrap();
        let mut charge =
            Charge::pending(Uuid::nil(), "Ana", Decimal::from(35), "Keys", assigned_at);
        insta::assert_snapshot!(charge.date_assigned_label(), @"April 7, 2025");

        let payment_id = Uuid::new_v4();
        charge.mark_paid(payment_id);
        assert!(!charge.is_pending());
        assert_eq!(charge.payment_id, Some(payment_id));
    }
}
