//! Persistence-friendly records for tenants, the ledger and maintenance requests.

pub mod charge;
pub mod common;
pub mod maintenance;
pub mod payment;
pub mod tenant;

pub use charge::{Charge, ChargeStatus};
pub use common::{new_record_id, Displayable, Identifiable};
pub use maintenance::{
    Feedback, MaintenanceCategory, Priority, Submission, SubmissionStatus, Urgency, WorkOrder,
    WorkOrderStatus,
};
pub use payment::{Payment, PaymentStatus, RentPeriod};
pub use tenant::Tenant;
