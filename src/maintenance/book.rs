use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::reconcile;
use crate::domain::{
    common::{find_by_id, find_by_id_mut},
    Submission, WorkOrder,
};

/// Holds both maintenance representations: what tenants submitted and what the
/// manager tracks.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MaintenanceBook {
    #[serde(default)]
    pub submissions: Vec<Submission>,
    #[serde(default)]
    pub work_orders: Vec<WorkOrder>,
}

impl MaintenanceBook {
    pub fn new(submissions: Vec<Submission>, work_orders: Vec<WorkOrder>) -> Self {
        Self {
            submissions,
            work_orders,
        }
    }

    pub fn add_submission(&mut self, submission: Submission) -> Uuid {
        let id = submission.id;
        self.submissions.push(submission);
        id
    }

    pub fn submission(&self, id: Uuid) -> Option<&Submission> {
        find_by_id(&self.submissions, id)
    }

    pub fn submission_mut(&mut self, id: Uuid) -> Option<&mut Submission> {
        find_by_id_mut(&mut self.submissions, id)
    }

    pub fn work_order(&self, id: Uuid) -> Option<&WorkOrder> {
        find_by_id(&self.work_orders, id)
    }

    pub fn work_order_mut(&mut self, id: Uuid) -> Option<&mut WorkOrder> {
        find_by_id_mut(&mut self.work_orders, id)
    }

    /// Replaces the work-order list with the reconciled one. Returns whether anything
    /// changed.
    pub fn reconcile(&mut self) -> bool {
        let merged = reconcile::reconcile_all(&self.submissions, &self.work_orders);
        if merged == self.work_orders {
            return false;
        }
        self.work_orders = merged;
        true
    }

    pub fn tenant_requests(&self, tenant_id: Uuid) -> Vec<Submission> {
        reconcile::tenant_view(&self.submissions, &self.work_orders, tenant_id)
    }
}
