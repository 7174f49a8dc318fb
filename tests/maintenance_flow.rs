mod common;

use common::{memory_manager, register};
use rentdesk_core::{
    core::services::{NewRequest, WorkOrderUpdate},
    domain::{MaintenanceCategory, Priority, SubmissionStatus, Urgency, WorkOrderStatus},
    CoreError,
};

fn request(title: &str, urgency: Urgency) -> NewRequest {
    NewRequest {
        title: title.into(),
        category: MaintenanceCategory::Electrical,
        urgency,
        description: "Hallway light flickers".into(),
    }
}

#[test]
fn high_urgency_request_becomes_high_priority_work_order() {
    let (manager, _) = memory_manager();
    let ana = register(&manager, "Ana", "1A");
    let submission = manager
        .submit_request(ana.id, request("Flickering light", Urgency::High))
        .unwrap();

    let orders = manager.work_orders().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, submission.id);
    assert_eq!(orders[0].priority, Priority::High);
    assert_eq!(orders[0].status, WorkOrderStatus::Pending);
    assert_eq!(orders[0].tenant_name, "Ana");
}

#[test]
fn listing_work_orders_twice_changes_nothing() {
    let (manager, _) = memory_manager();
    let ana = register(&manager, "Ana", "1A");
    manager
        .submit_request(ana.id, request("Broken socket", Urgency::Medium))
        .unwrap();
    let first = manager.work_orders().unwrap();
    let second = manager.work_orders().unwrap();
    assert_eq!(first, second);
}

#[test]
fn manager_edits_project_onto_the_tenant_view() {
    let (manager, _) = memory_manager();
    let ana = register(&manager, "Ana", "1A");
    let submission = manager
        .submit_request(ana.id, request("Broken socket", Urgency::Low))
        .unwrap();

    manager
        .update_work_order(
            submission.id,
            WorkOrderUpdate {
                status: Some(WorkOrderStatus::Completed),
                priority: Some(Priority::Medium),
                assigned_to: Some("Sparks Ltd".into()),
                manager_comments: Some("Replaced the socket".into()),
            },
        )
        .unwrap();
    let orders = manager.work_orders().unwrap();
    assert_eq!(orders[0].assigned_to, "Sparks Ltd");
    assert_eq!(orders[0].priority, Priority::Medium);

    let view = manager.tenant_requests(ana.id).unwrap();
    assert_eq!(view[0].status, SubmissionStatus::Completed);
}

#[test]
fn rating_needs_a_mirrored_request() {
    let (manager, _) = memory_manager();
    let err = manager
        .submit_rating(uuid::Uuid::new_v4(), 5, Some("great".into()))
        .expect_err("no such request");
    assert!(matches!(err, CoreError::NotFound { .. }));
}

#[test]
fn rating_lands_on_both_records() {
    let (manager, _) = memory_manager();
    let ana = register(&manager, "Ana", "1A");
    let submission = manager
        .submit_request(ana.id, request("Flickering light", Urgency::High))
        .unwrap();

    assert!(matches!(
        manager.submit_rating(submission.id, 7, None),
        Err(CoreError::InvalidRating(7))
    ));
    manager
        .submit_rating(submission.id, 5, Some("great".into()))
        .unwrap();

    let order = &manager.work_orders().unwrap()[0];
    assert!(order.feedback.is_rating_submitted);
    assert_eq!(order.feedback.tenant_rating, Some(5));
    let view = &manager.tenant_requests(ana.id).unwrap()[0];
    assert!(view.feedback.is_rating_submitted);
    assert_eq!(view.feedback.tenant_comment.as_deref(), Some("great"));
}

#[test]
fn requests_for_unknown_tenants_are_rejected() {
    let (manager, _) = memory_manager();
    let err = manager
        .submit_request(uuid::Uuid::new_v4(), request("Leak", Urgency::Low))
        .expect_err("unknown tenant");
    assert!(matches!(err, CoreError::InvalidTenant(_)));
}
