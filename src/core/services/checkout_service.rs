//! Combined rent-and-charges payment as submitted from the tenant dashboard.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::billing_service::BillingService;
use super::tenant_service::TenantService;
use crate::config::Config;
use crate::domain::{ChargeStatus, Payment, RentPeriod};
use crate::errors::{CoreError, CoreResult};
use crate::ledger::{calendar, rent, Ledger};

/// Card details entered at checkout. Only compared against the configured demo card;
/// a blank cardholder name is declined as well.
#[derive(Debug, Clone)]
pub struct PaymentInstrument {
    pub holder_name: String,
    pub card_number: String,
    pub cvv: String,
}

#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub tenant_id: Uuid,
    pub charge_ids: Vec<Uuid>,
    pub instrument: PaymentInstrument,
}

pub struct CheckoutService;

impl CheckoutService {
    /// Pays the next rent month (when one is due) together with the selected
    /// pending charges, as a single completed payment.
    pub fn pay(
        ledger: &mut Ledger,
        config: &Config,
        request: &CheckoutRequest,
        now: DateTime<Utc>,
    ) -> CoreResult<Payment> {
        let instrument = &request.instrument;
        if instrument.holder_name.trim().is_empty()
            || !config
                .demo_card
                .accepts(&instrument.card_number, &instrument.cvv)
        {
            return Err(CoreError::InstrumentDeclined);
        }

        let tenant = TenantService::require(ledger, request.tenant_id)?;
        let anchor = tenant.lease_start.unwrap_or_else(|| now.date_naive());
        let month = rent::next_payable_month(ledger.payments_for(tenant.id), anchor);

        let mut charge_total = Decimal::ZERO;
        let mut charge_concepts = Vec::with_capacity(request.charge_ids.len());
        let mut seen = HashSet::new();
        let mut selected = Vec::with_capacity(request.charge_ids.len());
        for charge_id in &request.charge_ids {
            if !seen.insert(*charge_id) {
                continue;
            }
            let charge = ledger
                .charge(*charge_id)
                .filter(|charge| charge.tenant_id == request.tenant_id)
                .ok_or_else(|| CoreError::not_found("charge", *charge_id))?;
            if !charge.is_pending() {
                return Err(CoreError::transition(
                    "charge",
                    charge.id,
                    charge.status,
                    ChargeStatus::Paid,
                ));
            }
            charge_total += charge.amount;
            charge_concepts.push(charge.concept.clone());
            selected.push(charge.id);
        }

        let rent_amount = rent::amount_due_for_month(month, config.monthly_rent);
        let amount = rent_amount + charge_total;
        let concept = checkout_concept(month.map(calendar::rent_label), &charge_concepts);

        match month {
            Some(month) => BillingService::record_rent_payment(
                ledger,
                request.tenant_id,
                amount,
                &concept,
                RentPeriod::containing(month),
                &selected,
                now,
            ),
            None => BillingService::record_payment(
                ledger,
                request.tenant_id,
                amount,
                &concept,
                &selected,
                now,
            ),
        }
    }
}

/// "Rent January 2025 + Keys, Paint", or "Charges: Keys, Paint" with no rent due.
fn checkout_concept(rent_label: Option<String>, charges: &[String]) -> String {
    match (rent_label, charges.is_empty()) {
        (Some(label), true) => label,
        (Some(label), false) => format!("{label} + {}", charges.join(", ")),
        (None, _) => format!("Charges: {}", charges.join(", ")),
    }
}
