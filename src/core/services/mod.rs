pub mod billing_service;
pub mod checkout_service;
pub mod maintenance_service;
pub mod summary_service;
pub mod tenant_service;

pub use billing_service::BillingService;
pub use checkout_service::{CheckoutRequest, CheckoutService, PaymentInstrument};
pub use maintenance_service::{MaintenanceService, NewRequest, WorkOrderUpdate};
pub use summary_service::{LedgerTotals, PortfolioSummary, SummaryService};
pub use tenant_service::TenantService;
