use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{new_record_id, Displayable, Identifiable};

/// A leaseholder that rent, charges and maintenance requests are tracked for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// First month rent is owed for. The rent scan anchors here when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease_start: Option<NaiveDate>,
}

impl Tenant {
    pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            id: new_record_id(),
            name: name.into(),
            unit: unit.into(),
            email: None,
            lease_start: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_lease_start(mut self, lease_start: NaiveDate) -> Self {
        self.lease_start = Some(lease_start);
        self
    }
}

impl Identifiable for Tenant {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Tenant {
    fn display_label(&self) -> String {
        format!("{} (unit {})", self.name, self.unit)
    }
}
