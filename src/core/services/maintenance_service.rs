use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    common::new_record_id, Displayable, Feedback, MaintenanceCategory, Priority, Submission,
    SubmissionStatus, Tenant, Urgency, WorkOrder, WorkOrderStatus,
};
use crate::errors::{CoreError, CoreResult};
use crate::maintenance::MaintenanceBook;

/// Form fields of a new tenant maintenance request.
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub title: String,
    pub category: MaintenanceCategory,
    pub urgency: Urgency,
    pub description: String,
}

/// Manager edits to a work order. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct WorkOrderUpdate {
    pub status: Option<WorkOrderStatus>,
    pub priority: Option<Priority>,
    pub assigned_to: Option<String>,
    pub manager_comments: Option<String>,
}

impl WorkOrderUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.priority.is_none()
            && self.assigned_to.is_none()
            && self.manager_comments.is_none()
    }
}

pub struct MaintenanceService;

impl MaintenanceService {
    pub fn submit_request(
        book: &mut MaintenanceBook,
        tenant: &Tenant,
        request: NewRequest,
        submitted_at: DateTime<Utc>,
    ) -> CoreResult<Submission> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(CoreError::Validation("request title must not be empty".into()));
        }
        let submission = Submission {
            id: new_record_id(),
            tenant_id: tenant.id,
            tenant_name: tenant.name.clone(),
            unit: tenant.unit.clone(),
            title: title.to_string(),
            category: request.category,
            urgency: request.urgency,
            description: request.description.trim().to_string(),
            date_submitted: submitted_at,
            status: SubmissionStatus::Sent,
            feedback: Feedback::default(),
        };
        book.add_submission(submission.clone());
        book.reconcile();
        tracing::info!(
            submission = %submission.display_label(),
            tenant = %tenant.id,
            "maintenance request submitted"
        );
        Ok(submission)
    }

    /// Records the tenant's rating on both the submission and its work order.
    pub fn submit_rating(
        book: &mut MaintenanceBook,
        request_id: Uuid,
        rating: u8,
        comment: Option<String>,
    ) -> CoreResult<()> {
        if !(1..=5).contains(&rating) {
            return Err(CoreError::InvalidRating(rating));
        }
        let submission = book
            .submission(request_id)
            .ok_or_else(|| CoreError::not_found("maintenance request", request_id))?;
        if book.work_order(request_id).is_none() {
            return Err(CoreError::not_found("work order", request_id));
        }
        if submission.feedback.is_rating_submitted {
            return Err(CoreError::transition(
                "maintenance request",
                request_id,
                "rated",
                "rated",
            ));
        }

        let feedback = Feedback {
            tenant_rating: Some(rating),
            tenant_comment: comment.map(|text| text.trim().to_string()),
            is_rating_submitted: true,
        };
        if let Some(submission) = book.submission_mut(request_id) {
            submission.feedback = feedback.clone();
        }
        if let Some(order) = book.work_order_mut(request_id) {
            order.feedback = feedback;
        }
        tracing::info!(request = %request_id, rating, "rating submitted");
        Ok(())
    }

    pub fn update_work_order(
        book: &mut MaintenanceBook,
        id: Uuid,
        update: WorkOrderUpdate,
    ) -> CoreResult<WorkOrder> {
        if update.is_empty() {
            return Err(CoreError::Validation("work order update has no changes".into()));
        }
        let order = book
            .work_order_mut(id)
            .ok_or_else(|| CoreError::not_found("work order", id))?;
        if let Some(status) = update.status {
            order.status = status;
        }
        if let Some(priority) = update.priority {
            order.priority = priority;
        }
        if let Some(assigned_to) = update.assigned_to {
            order.assigned_to = assigned_to.trim().to_string();
        }
        if let Some(comments) = update.manager_comments {
            order.manager_comments = comments;
        }
        tracing::info!(work_order = %order.display_label(), "work order updated");
        Ok(order.clone())
    }

    pub fn reconcile(book: &mut MaintenanceBook) -> bool {
        let changed = book.reconcile();
        if changed {
            tracing::debug!(work_orders = book.work_orders.len(), "work orders reconciled");
        }
        changed
    }
}
