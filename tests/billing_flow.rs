mod common;

use chrono::NaiveDate;
use common::{memory_manager, register};
use regex::Regex;
use rentdesk_core::{
    core::services::{CheckoutRequest, PaymentInstrument},
    domain::{ChargeStatus, PaymentStatus, RentPeriod},
    CoreError,
};
use rust_decimal::Decimal;

fn demo_card() -> PaymentInstrument {
    PaymentInstrument {
        holder_name: "Ana Lopez".into(),
        card_number: "4242424242424242".into(),
        cvv: "123".into(),
    }
}

fn month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

#[test]
fn first_rent_month_is_the_current_one() {
    let (manager, _) = memory_manager();
    let ana = register(&manager, "Ana", "1A");
    assert_eq!(manager.next_payable_month(ana.id).unwrap(), month(2025, 1));
}

#[test]
fn labelled_rent_payment_advances_the_schedule() {
    let (manager, _) = memory_manager();
    let ana = register(&manager, "Ana", "1A");
    manager
        .record_payment(ana.id, Decimal::from(1500), "Rent January 2025", &[])
        .unwrap();
    assert_eq!(manager.next_payable_month(ana.id).unwrap(), month(2025, 2));
}

#[test]
fn structured_period_counts_regardless_of_concept() {
    let (manager, _) = memory_manager();
    let ana = register(&manager, "Ana", "1A");
    let period = RentPeriod { year: 2025, month: 1 };
    manager
        .record_rent_payment(ana.id, Decimal::from(1500), "Enero", period, &[])
        .unwrap();
    assert_eq!(manager.next_payable_month(ana.id).unwrap(), month(2025, 2));
}

#[test]
fn settled_charge_cannot_be_deactivated() {
    let (manager, _) = memory_manager();
    let ana = register(&manager, "Ana", "1A");
    let charge = manager
        .assign_charge(ana.id, Decimal::from(50), "Late fee")
        .unwrap();
    let payment = manager
        .record_payment(ana.id, Decimal::from(50), "Late fee", &[charge.id])
        .unwrap();

    let charges = manager.charges_settled_by(payment.id).unwrap();
    assert_eq!(charges.len(), 1);
    assert_eq!(charges[0].status, ChargeStatus::Paid);
    assert_eq!(charges[0].payment_id, Some(payment.id));

    let err = manager
        .set_charge_status(charge.id, ChargeStatus::Deactivated)
        .expect_err("paid charge is final");
    assert!(matches!(err, CoreError::InvalidTransition { .. }));
}

#[test]
fn unknown_tenant_and_bad_amounts_are_rejected() {
    let (manager, _) = memory_manager();
    let ana = register(&manager, "Ana", "1A");
    assert!(matches!(
        manager.assign_charge(uuid::Uuid::new_v4(), Decimal::from(10), "Fee"),
        Err(CoreError::InvalidTenant(_))
    ));
    assert!(matches!(
        manager.record_payment(ana.id, Decimal::from(-5), "Refund", &[]),
        Err(CoreError::InvalidAmount(_))
    ));
}

#[test]
fn totals_never_double_count_paid_charges() {
    let (manager, _) = memory_manager();
    let ana = register(&manager, "Ana", "1A");
    let keys = manager.assign_charge(ana.id, Decimal::from(40), "Keys").unwrap();
    manager.assign_charge(ana.id, Decimal::from(25), "Bin").unwrap();

    let before = manager.totals(ana.id).unwrap();
    assert_eq!(before.pending_charges, Decimal::from(65));
    assert_eq!(before.paid_this_month, Decimal::ZERO);

    manager
        .record_payment(ana.id, Decimal::from(40), "Keys", &[keys.id])
        .unwrap();
    let after = manager.totals(ana.id).unwrap();
    assert_eq!(after.paid_this_month, Decimal::from(40));
    assert_eq!(after.pending_charges, Decimal::from(25));
    assert_eq!(after.total, after.paid_this_month + after.pending_charges);
}

#[test]
fn reverting_keeps_settled_charges_paid_but_flags_them() {
    let (manager, _) = memory_manager();
    let ana = register(&manager, "Ana", "1A");
    let keys = manager.assign_charge(ana.id, Decimal::from(40), "Keys").unwrap();
    let payment = manager
        .record_payment(ana.id, Decimal::from(40), "Keys", &[keys.id])
        .unwrap();

    let reverted = manager.revert_payment(payment.id).unwrap();
    assert_eq!(reverted.status, PaymentStatus::Reverted);
    assert_eq!(manager.charges(Some(ana.id)).unwrap()[0].status, ChargeStatus::Paid);
    let warnings = manager.ledger_warnings().unwrap();
    assert!(warnings.iter().any(|w| w.contains("reverted payment")), "{warnings:?}");

    assert!(matches!(
        manager.revert_payment(payment.id),
        Err(CoreError::InvalidTransition { .. })
    ));
    manager.reactivate_payment(payment.id).unwrap();
    assert!(manager.ledger_warnings().unwrap().is_empty());
}

#[test]
fn checkout_pays_rent_and_selected_charges() {
    let (manager, _) = memory_manager();
    let ana = register(&manager, "Ana", "1A");
    let keys = manager.assign_charge(ana.id, Decimal::from(40), "Keys").unwrap();
    let paint = manager.assign_charge(ana.id, Decimal::from(60), "Paint").unwrap();

    let due = manager.rent_status(ana.id).unwrap();
    assert_eq!(due.total, Decimal::new(160_000, 2));

    let payment = manager
        .pay_rent_and_charges(&CheckoutRequest {
            tenant_id: ana.id,
            charge_ids: vec![keys.id, paint.id],
            instrument: demo_card(),
        })
        .unwrap();

    let concept = Regex::new(r"^Rent [A-Z][a-z]+ \d{4}( \+ [^,]+(, [^,]+)*)?$").unwrap();
    assert!(concept.is_match(&payment.concept), "{}", payment.concept);
    assert_eq!(payment.concept, "Rent January 2025 + Keys, Paint");
    assert_eq!(payment.amount, Decimal::new(160_000, 2));

    let after = manager.rent_status(ana.id).unwrap();
    assert_eq!(after.month, month(2025, 2));
    assert_eq!(after.charges, Decimal::ZERO);
}

#[test]
fn declined_card_changes_nothing() {
    let (manager, storage) = memory_manager();
    let ana = register(&manager, "Ana", "1A");
    let saved_before = storage.contents(rentdesk_core::storage::Bucket::Payments);

    let mut card = demo_card();
    card.cvv = "999".into();
    let err = manager
        .pay_rent_and_charges(&CheckoutRequest {
            tenant_id: ana.id,
            charge_ids: Vec::new(),
            instrument: card,
        })
        .expect_err("wrong cvv");
    assert!(matches!(err, CoreError::InstrumentDeclined));
    assert!(manager.payments(Some(ana.id)).unwrap().is_empty());
    assert_eq!(
        storage.contents(rentdesk_core::storage::Bucket::Payments),
        saved_before
    );
}

#[test]
fn portfolio_summarizes_every_tenant() {
    let (manager, _) = memory_manager();
    let ana = register(&manager, "Ana", "1A");
    let ben = register(&manager, "Ben", "2B");
    manager
        .record_payment(ana.id, Decimal::from(1500), "Rent January 2025", &[])
        .unwrap();
    manager.assign_charge(ben.id, Decimal::from(30), "Parking").unwrap();

    let summary = manager.portfolio_summary().unwrap();
    assert_eq!(summary.tenants, 2);
    assert_eq!(summary.collected_this_month, Decimal::from(1500));
    assert_eq!(summary.outstanding_charges, Decimal::from(30));
    assert_eq!(summary.tenants_with_rent_due, 1);
}
