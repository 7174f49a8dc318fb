//! Tenant submissions, manager work orders, and the merge between them.

pub mod book;
pub mod reconcile;

pub use book::MaintenanceBook;
pub use reconcile::{project_tenant_status, reconcile_all, tenant_view};
