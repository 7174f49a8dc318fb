pub mod json_backend;
pub mod memory;

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{ChargeStatus, PaymentStatus},
    errors::CoreResult,
    ledger::{calendar, Ledger},
};

pub use json_backend::JsonStorage;
pub use memory::MemoryStorage;

/// Named collections the storage collaborator holds, each a JSON array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    Payments,
    Charges,
    Tenants,
    TenantSubmissions,
    WorkOrders,
    Quarantine,
}

impl Bucket {
    pub fn name(self) -> &'static str {
        match self {
            Bucket::Payments => "payments",
            Bucket::Charges => "charges",
            Bucket::Tenants => "tenants",
            Bucket::TenantSubmissions => "tenant_submissions",
            Bucket::WorkOrders => "work_orders",
            Bucket::Quarantine => "quarantine",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque key-value persistence for bucket payloads.
///
/// `load` returns `None` for a bucket that was never written. `save_all` must either
/// persist every entry or report an error; the default implementation saves entries
/// one after another and is only as atomic as `save`.
pub trait PersistenceGateway: Send + Sync {
    fn load(&self, bucket: Bucket) -> CoreResult<Option<String>>;
    fn save(&self, bucket: Bucket, payload: &str) -> CoreResult<()>;

    fn save_all(&self, batch: &[(Bucket, String)]) -> CoreResult<()> {
        for (bucket, payload) in batch {
            self.save(*bucket, payload)?;
        }
        Ok(())
    }
}

impl<T: PersistenceGateway + ?Sized> PersistenceGateway for Arc<T> {
    fn load(&self, bucket: Bucket) -> CoreResult<Option<String>> {
        (**self).load(bucket)
    }

    fn save(&self, bucket: Bucket, payload: &str) -> CoreResult<()> {
        (**self).save(bucket, payload)
    }

    fn save_all(&self, batch: &[(Bucket, String)]) -> CoreResult<()> {
        (**self).save_all(batch)
    }
}

/// A record (or a whole payload) that could not be decoded, kept aside instead of
/// being dropped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuarantinedRecord {
    pub bucket: String,
    pub reason: String,
    pub record: Value,
}

/// Outcome of decoding one bucket.
#[derive(Debug, Clone)]
pub struct LoadReport<T> {
    pub records: Vec<T>,
    pub quarantined: Vec<QuarantinedRecord>,
    pub warnings: Vec<String>,
}

impl<T> Default for LoadReport<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            quarantined: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl<T> LoadReport<T> {
    fn quarantine(&mut self, bucket: Bucket, reason: String, record: Value) {
        tracing::warn!(%bucket, %reason, "quarantining unreadable record");
        self.warnings.push(format!("{bucket}: {reason}"));
        self.quarantined.push(QuarantinedRecord {
            bucket: bucket.name().to_string(),
            reason,
            record,
        });
    }
}

/// Loads and decodes a bucket. Storage read failures propagate; a missing bucket is
/// empty, and unreadable content is quarantined.
pub fn load_records<T: DeserializeOwned>(
    gateway: &dyn PersistenceGateway,
    bucket: Bucket,
) -> CoreResult<LoadReport<T>> {
    match gateway.load(bucket)? {
        Some(raw) => Ok(decode_records(bucket, &raw)),
        None => Ok(LoadReport::default()),
    }
}

/// Decodes a JSON array payload record by record.
pub fn decode_records<T: DeserializeOwned>(bucket: Bucket, raw: &str) -> LoadReport<T> {
    let mut report = LoadReport::default();
    if raw.trim().is_empty() {
        return report;
    }
    let items = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        Ok(other) => {
            report.quarantine(bucket, "payload is not a JSON array".into(), other);
            return report;
        }
        Err(err) => {
            report.quarantine(
                bucket,
                format!("payload is not valid JSON: {err}"),
                Value::String(raw.to_string()),
            );
            return report;
        }
    };
    for item in items {
        match T::deserialize(&item) {
            Ok(record) => report.records.push(record),
            Err(err) => report.quarantine(bucket, err.to_string(), item),
        }
    }
    report
}

pub fn encode_records<T: Serialize>(records: &[T]) -> CoreResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Detects dangling references and suspicious states within a ledger snapshot.
pub fn ledger_warnings(ledger: &Ledger) -> Vec<String> {
    let tenant_ids: HashSet<_> = ledger.tenants.iter().map(|t| t.id).collect();
    let mut warnings = Vec::new();

    for payment in &ledger.payments {
        if !tenant_ids.contains(&payment.tenant_id) {
            warnings.push(format!(
                "payment {} references unknown tenant {}",
                payment.id, payment.tenant_id
            ));
        }
        if payment.period.is_none() && !rent_label_recognised(&payment.concept) {
            warnings.push(format!(
                "payment {} looks like rent but \"{}\" matches no rent month",
                payment.id, payment.concept
            ));
        }
    }

    for charge in &ledger.charges {
        if !tenant_ids.contains(&charge.tenant_id) {
            warnings.push(format!(
                "charge {} references unknown tenant {}",
                charge.id, charge.tenant_id
            ));
        }
        if charge.status != ChargeStatus::Paid {
            continue;
        }
        match charge.payment_id.and_then(|id| ledger.payment(id)) {
            None => warnings.push(format!(
                "charge {} is paid but its settling payment is missing",
                charge.id
            )),
            Some(payment) if payment.status == PaymentStatus::Reverted => {
                warnings.push(format!(
                    "charge {} is paid by reverted payment {}",
                    charge.id, payment.id
                ))
            }
            Some(_) => {}
        }
    }
    warnings
}

/// False for concepts that start like a rent label but would never be matched by
/// the scheduler, such as "Rent Jan 2025" or "Rent janvier 2025".
fn rent_label_recognised(concept: &str) -> bool {
    let looks_like_rent = concept
        .get(..5)
        .is_some_and(|head| head.eq_ignore_ascii_case("rent "));
    if !looks_like_rent {
        return true;
    }
    calendar::parse_rent_label(concept)
        .is_some_and(|month| concept.starts_with(&calendar::rent_label(month)))
}
