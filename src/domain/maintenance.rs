use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{Displayable, Identifiable};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceCategory {
    Plumbing,
    Electrical,
    Appliance,
    General,
}

impl MaintenanceCategory {
    /// Manager-facing label.
    pub fn label(self) -> &'static str {
        match self {
            MaintenanceCategory::Plumbing => "Plumbing",
            MaintenanceCategory::Electrical => "Electrical",
            MaintenanceCategory::Appliance => "Appliance",
            MaintenanceCategory::General => "General",
        }
    }
}

/// Urgency as reported by the tenant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// Priority as tracked by the manager. Seeded from [`Urgency`] once.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl From<Urgency> for Priority {
    fn from(urgency: Urgency) -> Self {
        match urgency {
            Urgency::Low => Priority::Low,
            Urgency::Medium => Priority::Medium,
            Urgency::High => Priority::High,
        }
    }
}

/// Authoritative work-order status, owned by the manager.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum WorkOrderStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Rejected,
}

/// Coarse status shown to the tenant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SubmissionStatus {
    #[default]
    Sent,
    InProgress,
    Completed,
    Cancelled,
}

impl From<WorkOrderStatus> for SubmissionStatus {
    fn from(status: WorkOrderStatus) -> Self {
        match status {
            WorkOrderStatus::Pending => SubmissionStatus::Sent,
            WorkOrderStatus::InProgress => SubmissionStatus::InProgress,
            WorkOrderStatus::Completed => SubmissionStatus::Completed,
            WorkOrderStatus::Rejected => SubmissionStatus::Cancelled,
        }
    }
}

/// Tenant rating and comment, mirrored on both the submission and the work order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Feedback {
    pub tenant_rating: Option<u8>,
    pub tenant_comment: Option<String>,
    pub is_rating_submitted: bool,
}

/// Tenant-authored maintenance request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Submission {
    pub id: Uuid,
    #[serde(default)]
    pub tenant_id: Uuid,
    #[serde(default)]
    pub tenant_name: String,
    #[serde(default)]
    pub unit: String,
    pub title: String,
    pub category: MaintenanceCategory,
    pub urgency: Urgency,
    #[serde(default)]
    pub description: String,
    pub date_submitted: DateTime<Utc>,
    /// Advisory only once a work order mirrors this submission.
    #[serde(default)]
    pub status: SubmissionStatus,
    #[serde(flatten)]
    pub feedback: Feedback,
}

impl Identifiable for Submission {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Submission {
    fn display_label(&self) -> String {
        format!("{} [{:?}]", self.title, self.status)
    }
}

/// Manager-facing canonical maintenance record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkOrder {
    pub id: Uuid,
    #[serde(default)]
    pub tenant_id: Uuid,
    pub tenant_name: String,
    #[serde(default)]
    pub unit: String,
    pub category: MaintenanceCategory,
    pub description: String,
    #[serde(default)]
    pub full_description: String,
    pub date_submitted: DateTime<Utc>,
    #[serde(default)]
    pub status: WorkOrderStatus,
    pub priority: Priority,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(default)]
    pub manager_comments: String,
    #[serde(flatten)]
    pub feedback: Feedback,
}

impl WorkOrder {
    /// Seeds a pending, unassigned work order from a tenant submission.
    pub fn mirror_of(submission: &Submission) -> Self {
        Self {
            id: submission.id,
            tenant_id: submission.tenant_id,
            tenant_name: submission.tenant_name.clone(),
            unit: submission.unit.clone(),
            category: submission.category,
            description: submission.title.clone(),
            full_description: submission.description.clone(),
            date_submitted: submission.date_submitted,
            status: WorkOrderStatus::Pending,
            priority: Priority::from(submission.urgency),
            assigned_to: String::new(),
            manager_comments: String::new(),
            feedback: submission.feedback.clone(),
        }
    }
}

impl Identifiable for WorkOrder {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for WorkOrder {
    fn display_label(&self) -> String {
        format!(
            "{} / {} [{:?}, {:?}]",
            self.category.label(),
            self.description,
            self.status,
            self.priority
        )
    }
}
