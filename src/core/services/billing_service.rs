//! Payments and charges: recording, reverting, assigning and status changes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::tenant_service::TenantService;
use crate::domain::{Charge, ChargeStatus, Displayable, Payment, PaymentStatus, RentPeriod};
use crate::errors::{CoreError, CoreResult};
use crate::ledger::Ledger;

/// Enforces the payment and charge state machines on a [`Ledger`].
pub struct BillingService;

impl BillingService {
    /// Records a completed payment and settles every listed charge that is still
    /// pending for the same tenant. Other ids are skipped.
    pub fn record_payment(
        ledger: &mut Ledger,
        tenant_id: Uuid,
        amount: Decimal,
        concept: &str,
        settled_charge_ids: &[Uuid],
        paid_at: DateTime<Utc>,
    ) -> CoreResult<Payment> {
        Self::record(
            ledger,
            tenant_id,
            amount,
            concept,
            None,
            settled_charge_ids,
            paid_at,
        )
    }

    /// Same as [`BillingService::record_payment`], tagging the payment with the rent
    /// month it covers.
    pub fn record_rent_payment(
        ledger: &mut Ledger,
        tenant_id: Uuid,
        amount: Decimal,
        concept: &str,
        period: RentPeriod,
        settled_charge_ids: &[Uuid],
        paid_at: DateTime<Utc>,
    ) -> CoreResult<Payment> {
        Self::record(
            ledger,
            tenant_id,
            amount,
            concept,
            Some(period),
            settled_charge_ids,
            paid_at,
        )
    }

    fn record(
        ledger: &mut Ledger,
        tenant_id: Uuid,
        amount: Decimal,
        concept: &str,
        period: Option<RentPeriod>,
        settled_charge_ids: &[Uuid],
        paid_at: DateTime<Utc>,
    ) -> CoreResult<Payment> {
        ensure_positive(amount)?;
        let tenant_name = TenantService::require(ledger, tenant_id)?.name.clone();
        let mut payment = Payment::completed(tenant_id, tenant_name, amount, concept, paid_at);
        payment.period = period;

        for charge_id in settled_charge_ids {
            match ledger.charge_mut(*charge_id) {
                Some(charge) if charge.tenant_id == tenant_id && charge.is_pending() => {
                    charge.mark_paid(payment.id);
                    payment.settled_charge_ids.push(charge.id);
                }
                Some(charge) => {
                    tracing::warn!(
                        charge = %charge.id,
                        status = ?charge.status,
                        "charge not settled: not pending for this tenant"
                    );
                }
                None => tracing::warn!(charge = %charge_id, "charge not settled: unknown id"),
            }
        }

        tracing::info!(
            payment = %payment.display_label(),
            settled = payment.settled_charge_ids.len(),
            "payment recorded"
        );
        ledger.add_payment(payment.clone());
        Ok(payment)
    }

    /// Marks a completed payment as reverted.
    ///
    /// Charges it settled stay `Paid`; see [`Ledger::charges_settled_by`].
    pub fn revert_payment(ledger: &mut Ledger, payment_id: Uuid) -> CoreResult<Payment> {
        let payment = Self::flip_payment(
            ledger,
            payment_id,
            PaymentStatus::Completed,
            PaymentStatus::Reverted,
        )?;
        let settled = ledger.charges_settled_by(payment_id).len();
        if settled > 0 {
            tracing::warn!(
                payment = %payment_id,
                settled,
                "reverted payment still settles charges"
            );
        }
        Ok(payment)
    }

    /// Returns a reverted payment to `Completed`.
    pub fn reactivate_payment(ledger: &mut Ledger, payment_id: Uuid) -> CoreResult<Payment> {
        Self::flip_payment(
            ledger,
            payment_id,
            PaymentStatus::Reverted,
            PaymentStatus::Completed,
        )
    }

    fn flip_payment(
        ledger: &mut Ledger,
        payment_id: Uuid,
        from: PaymentStatus,
        to: PaymentStatus,
    ) -> CoreResult<Payment> {
        let payment = ledger
            .payment_mut(payment_id)
            .ok_or_else(|| CoreError::not_found("payment", payment_id))?;
        if payment.status != from {
            return Err(CoreError::transition(
                "payment",
                payment_id,
                payment.status,
                to,
            ));
        }
        payment.status = to;
        Ok(payment.clone())
    }

    /// Creates a pending charge for a known tenant.
    pub fn assign_charge(
        ledger: &mut Ledger,
        tenant_id: Uuid,
        amount: Decimal,
        concept: &str,
        assigned_at: DateTime<Utc>,
    ) -> CoreResult<Charge> {
        ensure_positive(amount)?;
        if concept.trim().is_empty() {
            return Err(CoreError::Validation("charge concept is required".into()));
        }
        let tenant_name = TenantService::require(ledger, tenant_id)?.name.clone();
        let charge = Charge::pending(tenant_id, tenant_name, amount, concept.trim(), assigned_at);
        ledger.add_charge(charge.clone());
        Ok(charge)
    }

    /// Applies a manager status change: only `Pending <-> Deactivated` is allowed here.
    pub fn set_charge_status(
        ledger: &mut Ledger,
        charge_id: Uuid,
        status: ChargeStatus,
    ) -> CoreResult<Charge> {
        let charge = ledger
            .charge_mut(charge_id)
            .ok_or_else(|| CoreError::not_found("charge", charge_id))?;
        if !charge.status.can_set(status) {
            return Err(CoreError::transition(
                "charge",
                charge_id,
                charge.status,
                status,
            ));
        }
        charge.status = status;
        Ok(charge.clone())
    }
}

fn ensure_positive(amount: Decimal) -> CoreResult<()> {
    if amount <= Decimal::ZERO {
        return Err(CoreError::InvalidAmount(amount));
    }
    Ok(())
}
