//! Pure merge of tenant submissions into the manager's work-order list.
//!
//! The work order is authoritative for operational fields (status, priority,
//! assignment, comments). Submissions only seed new work orders and carry tenant
//! feedback forward, so running the merge again never changes its output.

use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::{Submission, SubmissionStatus, WorkOrder, WorkOrderStatus};

/// Merges `submissions` into `work_orders`.
///
/// Existing work orders keep their position and manager-owned fields; only the
/// feedback fields are refreshed from the matching submission. Submissions without
/// a work order get a new pending one appended. Duplicate work-order ids keep the
/// first occurrence.
pub fn reconcile_all(submissions: &[Submission], work_orders: &[WorkOrder]) -> Vec<WorkOrder> {
    let mut merged: Vec<WorkOrder> = Vec::with_capacity(work_orders.len() + submissions.len());
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for order in work_orders {
        if index.contains_key(&order.id) {
            tracing::warn!(id = %order.id, "dropping duplicate work order");
            continue;
        }
        index.insert(order.id, merged.len());
        merged.push(order.clone());
    }

    for submission in submissions {
        match index.get(&submission.id) {
            Some(&position) => {
                merged[position].feedback = submission.feedback.clone();
            }
            None => {
                tracing::info!(id = %submission.id, "mirroring submission as work order");
                index.insert(submission.id, merged.len());
                merged.push(WorkOrder::mirror_of(submission));
            }
        }
    }

    merged
}

/// Status the tenant sees for a work order.
pub fn project_tenant_status(status: WorkOrderStatus) -> SubmissionStatus {
    SubmissionStatus::from(status)
}

/// A tenant's submissions with their display status projected from the work order.
/// Submissions not yet mirrored keep their stored status.
pub fn tenant_view(
    submissions: &[Submission],
    work_orders: &[WorkOrder],
    tenant_id: Uuid,
) -> Vec<Submission> {
    let statuses: HashMap<Uuid, WorkOrderStatus> = work_orders
        .iter()
        .map(|order| (order.id, order.status))
        .collect();
    submissions
        .iter()
        .filter(|submission| submission.tenant_id == tenant_id)
        .map(|submission| {
            let mut view = submission.clone();
            if let Some(status) = statuses.get(&submission.id) {
                view.status = project_tenant_status(*status);
            }
            view
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Feedback, MaintenanceCategory, Priority, Urgency};
    use chrono::{TimeZone, Utc};

    fn submission(title: &str, urgency: Urgency) -> Submission {
        Submission {
            id: Uuid::new_v4(),
            tenant_id: Uuid::nil(),
            tenant_name: "Ana".into(),
            unit: "1A".into(),
            title: title.into(),
            category: MaintenanceCategory::Plumbing,
            urgency,
            description: format!("{title} in the kitchen"),
            date_submitted: Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0).unwrap(),
            status: SubmissionStatus::Sent,
            feedback: Feedback::default(),
        }
    }

    #[test]
    fn unmirrored_submission_becomes_pending_work_order() {
        let submissions = vec![submission("Leaking tap", Urgency::High)];
        let orders = reconcile_all(&submissions, &[]);
        assert_eq!(orders.len(), 1);
        let order = &orders[0];
        assert_eq!(order.id, submissions[0].id);
        assert_eq!(order.priority, Priority::High);
        assert_eq!(order.status, WorkOrderStatus::Pending);
        assert_eq!(order.description, "Leaking tap");
        assert_eq!(order.full_description, "Leaking tap in the kitchen");
        assert!(order.assigned_to.is_empty());
        assert!(order.manager_comments.is_empty());
    }

    #[test]
    fn rated_submission_seeds_work_order_with_its_feedback() {
        let mut tap = submission("Leaking tap", Urgency::Medium);
        tap.feedback = Feedback {
            tenant_rating: Some(5),
            tenant_comment: Some("great".into()),
            is_rating_submitted: true,
        };
        let orders = reconcile_all(std::slice::from_ref(&tap), &[]);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].status, WorkOrderStatus::Pending);
        assert_eq!(orders[0].feedback, tap.feedback);
        assert!(orders[0].feedback.is_rating_submitted);
        assert_eq!(orders[0].feedback.tenant_rating, Some(5));
    }

    #[test]
    fn manager_fields_survive_and_feedback_flows_forward() {
        let mut tap = submission("Leaking tap", Urgency::Low);
        let mut orders = reconcile_all(std::slice::from_ref(&tap), &[]);
        orders[0].status = WorkOrderStatus::Completed;
        orders[0].priority = Priority::High;
        orders[0].assigned_to = "Plumbing Co".into();
        orders[0].manager_comments = "Replaced washer".into();

        tap.feedback = Feedback {
            tenant_rating: Some(4),
            tenant_comment: Some("Quick fix".into()),
            is_rating_submitted: true,
        };
        let merged = reconcile_all(std::slice::from_ref(&tap), &orders);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].status, WorkOrderStatus::Completed);
        assert_eq!(merged[0].priority, Priority::High);
        assert_eq!(merged[0].assigned_to, "Plumbing Co");
        assert_eq!(merged[0].manager_comments, "Replaced washer");
        assert_eq!(merged[0].feedback.tenant_rating, Some(4));
    }

    #[test]
    fn reconcile_is_idempotent() {
        let submissions = vec![
            submission("Leaking tap", Urgency::High),
            submission("Flickering light", Urgency::Medium),
        ];
        let existing = reconcile_all(&submissions[..1], &[]);
        let once = reconcile_all(&submissions, &existing);
        let twice = reconcile_all(&submissions, &once);
        assert_eq!(once, twice);
        assert_eq!(twice.len(), 2);
    }

    #[test]
    fn duplicate_work_orders_collapse() {
        let submissions = vec![submission("Leaking tap", Urgency::High)];
        let order = reconcile_all(&submissions, &[]).remove(0);
        let merged = reconcile_all(&submissions, &[order.clone(), order]);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn tenant_view_projects_manager_status() {
        let submissions = vec![submission("Leaking tap", Urgency::High)];
        let mut orders = reconcile_all(&submissions, &[]);
        orders[0].status = WorkOrderStatus::Rejected;
        let view = tenant_view(&submissions, &orders, Uuid::nil());
        assert_eq!(view[0].status, SubmissionStatus::Cancelled);
        assert!(tenant_view(&submissions, &orders, Uuid::new_v4()).is_empty());
    }
}
