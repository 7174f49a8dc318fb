//! Roster management for tenants.

use uuid::Uuid;

use crate::domain::{Displayable, Tenant};
use crate::errors::{CoreError, CoreResult};
use crate::ledger::Ledger;

pub struct TenantService;

impl TenantService {
    /// Adds a tenant to the roster and returns its identifier.
    pub fn register(ledger: &mut Ledger, tenant: Tenant) -> CoreResult<Uuid> {
        if tenant.name.trim().is_empty() {
            return Err(CoreError::Validation("tenant name is required".into()));
        }
        if tenant.unit.trim().is_empty() {
            return Err(CoreError::Validation("tenant unit is required".into()));
        }
        if ledger.tenant(tenant.id).is_some() {
            return Err(CoreError::Validation(format!(
                "tenant {} is already registered",
                tenant.id
            )));
        }
        tracing::info!(tenant = %tenant.display_label(), "tenant registered");
        Ok(ledger.add_tenant(tenant))
    }

    /// Looks up a tenant, failing with `InvalidTenant` when unknown.
    pub fn require(ledger: &Ledger, id: Uuid) -> CoreResult<&Tenant> {
        ledger.tenant(id).ok_or(CoreError::InvalidTenant(id))
    }
}
