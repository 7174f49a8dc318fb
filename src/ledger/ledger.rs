use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    common::{find_by_id, find_by_id_mut},
    Charge, Payment, Tenant,
};

/// In-memory tenant roster plus the payments and charges recorded against it.
///
/// Collections are append-style: records change status but are never removed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ledger {
    #[serde(default)]
    pub tenants: Vec<Tenant>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub charges: Vec<Charge>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(tenants: Vec<Tenant>, payments: Vec<Payment>, charges: Vec<Charge>) -> Self {
        Self {
            tenants,
            payments,
            charges,
        }
    }

    pub fn add_tenant(&mut self, tenant: Tenant) -> Uuid {
        let id = tenant.id;
        self.tenants.push(tenant);
        id
    }

    pub fn add_payment(&mut self, payment: Payment) -> Uuid {
        let id = payment.id;
        self.payments.push(payment);
        id
    }

    pub fn add_charge(&mut self, charge: Charge) -> Uuid {
        let id = charge.id;
        self.charges.push(charge);
        id
    }

    pub fn tenant(&self, id: Uuid) -> Option<&Tenant> {
        find_by_id(&self.tenants, id)
    }

    pub fn payment(&self, id: Uuid) -> Option<&Payment> {
        find_by_id(&self.payments, id)
    }

    pub fn payment_mut(&mut self, id: Uuid) -> Option<&mut Payment> {
        find_by_id_mut(&mut self.payments, id)
    }

    pub fn charge(&self, id: Uuid) -> Option<&Charge> {
        find_by_id(&self.charges, id)
    }

    pub fn charge_mut(&mut self, id: Uuid) -> Option<&mut Charge> {
        find_by_id_mut(&mut self.charges, id)
    }

    pub fn payments_for(&self, tenant_id: Uuid) -> impl Iterator<Item = &Payment> {
        self.payments
            .iter()
            .filter(move |payment| payment.tenant_id == tenant_id)
    }

    pub fn charges_for(&self, tenant_id: Uuid) -> impl Iterator<Item = &Charge> {
        self.charges
            .iter()
            .filter(move |charge| charge.tenant_id == tenant_id)
    }

    /// Charges whose `payment_id` points at the given payment.
    pub fn charges_settled_by(&self, payment_id: Uuid) -> Vec<&Charge> {
        self.charges
            .iter()
            .filter(|charge| charge.payment_id == Some(payment_id))
            .collect()
    }
}
