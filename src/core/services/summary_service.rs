use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::tenant_service::TenantService;
use crate::errors::CoreResult;
use crate::ledger::{calendar, rent, Ledger, RentDue};

/// Figures shown on a tenant's summary cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerTotals {
    /// Completed payments dated in the current calendar month.
    pub paid_this_month: Decimal,
    /// Charges still pending. Paid and deactivated charges are excluded.
    pub pending_charges: Decimal,
    pub total: Decimal,
}

/// Manager dashboard figures across every tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortfolioSummary {
    pub tenants: usize,
    pub collected_this_month: Decimal,
    pub outstanding_charges: Decimal,
    pub tenants_with_rent_due: usize,
}

pub struct SummaryService;

impl SummaryService {
    /// Read-only totals for one tenant. An unknown tenant simply has nothing to show.
    pub fn totals(ledger: &Ledger, tenant_id: Uuid, today: NaiveDate) -> LedgerTotals {
        let paid_this_month: Decimal = ledger
            .payments_for(tenant_id)
            .filter(|payment| payment.is_completed())
            .filter(|payment| calendar::same_month(payment.paid_at.date_naive(), today))
            .map(|payment| payment.amount)
            .sum();
        let pending_charges = rent::pending_charges_total(ledger.charges_for(tenant_id));
        LedgerTotals {
            paid_this_month,
            pending_charges,
            total: paid_this_month + pending_charges,
        }
    }

    /// Date the rent scan starts from: the lease start when known, otherwise today.
    pub fn anchor_for(ledger: &Ledger, tenant_id: Uuid, today: NaiveDate) -> CoreResult<NaiveDate> {
        let tenant = TenantService::require(ledger, tenant_id)?;
        Ok(tenant.lease_start.unwrap_or(today))
    }

    pub fn next_payable_month(
        ledger: &Ledger,
        tenant_id: Uuid,
        today: NaiveDate,
    ) -> CoreResult<Option<NaiveDate>> {
        let anchor = Self::anchor_for(ledger, tenant_id, today)?;
        Ok(rent::next_payable_month(ledger.payments_for(tenant_id), anchor))
    }

    pub fn rent_due(
        ledger: &Ledger,
        tenant_id: Uuid,
        today: NaiveDate,
        monthly_rent: Decimal,
    ) -> CoreResult<RentDue> {
        let anchor = Self::anchor_for(ledger, tenant_id, today)?;
        Ok(rent::rent_due(
            ledger.payments_for(tenant_id),
            ledger.charges_for(tenant_id),
            anchor,
            monthly_rent,
        ))
    }

    pub fn portfolio(ledger: &Ledger, today: NaiveDate) -> PortfolioSummary {
        let current_month = calendar::first_day_of_month(today);
        let mut summary = PortfolioSummary {
            tenants: ledger.tenants.len(),
            collected_this_month: Decimal::ZERO,
            outstanding_charges: Decimal::ZERO,
            tenants_with_rent_due: 0,
        };
        for tenant in &ledger.tenants {
            let totals = Self::totals(ledger, tenant.id, today);
            summary.collected_this_month += totals.paid_this_month;
            summary.outstanding_charges += totals.pending_charges;
            let anchor = tenant.lease_start.unwrap_or(today);
            let due = rent::next_payable_month(ledger.payments_for(tenant.id), anchor);
            if due.is_some_and(|month| month <= current_month) {
                summary.tenants_with_rent_due += 1;
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::BillingService;
    use crate::domain::{ChargeStatus, Tenant};
    use chrono::{TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 10).unwrap()
    }

    #[test]
    fn totals_count_current_month_and_pending_only() {
        let mut ledger = Ledger::new();
        let tenant = ledger.add_tenant(Tenant::new("Ana", "1A"));
        let january = Utc.with_ymd_and_hms(2025, 1, 20, 9, 0, 0).unwrap();
        let february = Utc.with_ymd_and_hms(2025, 2, 3, 9, 0, 0).unwrap();

        BillingService::record_payment(&mut ledger, tenant, Decimal::from(900), "Old", &[], january)
            .unwrap();
        let reverted = BillingService::record_payment(
            &mut ledger,
            tenant,
            Decimal::from(300),
            "Oops",
            &[],
            february,
        )
        .unwrap();
        BillingService::revert_payment(&mut ledger, reverted.id).unwrap();

        let settled =
            BillingService::assign_charge(&mut ledger, tenant, Decimal::from(40), "Keys", january)
                .unwrap();
        BillingService::record_payment(
            &mut ledger,
            tenant,
            Decimal::from(40),
            "Keys",
            &[settled.id],
            february,
        )
        .unwrap();
        BillingService::assign_charge(&mut ledger, tenant, Decimal::from(25), "Bin", february)
            .unwrap();
        let dropped =
            BillingService::assign_charge(&mut ledger, tenant, Decimal::from(99), "Fine", february)
                .unwrap();
        BillingService::set_charge_status(&mut ledger, dropped.id, ChargeStatus::Deactivated)
            .unwrap();

        let totals = SummaryService::totals(&ledger, tenant, today());
        assert_eq!(totals.paid_this_month, Decimal::from(40));
        assert_eq!(totals.pending_charges, Decimal::from(25));
        assert_eq!(totals.total, Decimal::from(65));
    }

    #[test]
    fn unknown_tenant_totals_are_empty() {
        let ledger = Ledger::new();
        let totals = SummaryService::totals(&ledger, Uuid::new_v4(), today());
        assert!(totals.total.is_zero());
    }

    #[test]
    fn lease_start_anchors_the_scan() {
        let mut ledger = Ledger::new();
        let lease = NaiveDate::from_ymd_opt(2024, 11, 15).unwrap();
        let tenant = ledger.add_tenant(Tenant::new("Ana", "1A").with_lease_start(lease));
        let next = SummaryService::next_payable_month(&ledger, tenant, today()).unwrap();
        assert_eq!(next, NaiveDate::from_ymd_opt(2024, 11, 1));
    }

    #[test]
    fn portfolio_counts_tenants_owing_rent() {
        let mut ledger = Ledger::new();
        let paid = ledger.add_tenant(Tenant::new("Ana", "1A"));
        ledger.add_tenant(Tenant::new("Ben", "2B"));
        let paid_at = Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap();
        BillingService::record_payment(
            &mut ledger,
            paid,
            Decimal::from(1500),
            "Rent February 2025",
            &[],
            paid_at,
        )
        .unwrap();

        let summary = SummaryService::portfolio(&ledger, today());
        assert_eq!(summary.tenants, 2);
        assert_eq!(summary.tenants_with_rent_due, 1);
        assert_eq!(summary.collected_this_month, Decimal::from(1500));
    }
}
