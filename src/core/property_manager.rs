use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::services::{
    BillingService, CheckoutRequest, CheckoutService, LedgerTotals, MaintenanceService,
    NewRequest, PortfolioSummary, SummaryService, TenantService, WorkOrderUpdate,
};
use super::time::{Clock, SystemClock};
use super::utils::PathResolver;
use crate::config::{Config, ConfigManager};
use crate::domain::{Charge, ChargeStatus, Payment, RentPeriod, Submission, Tenant, WorkOrder};
use crate::errors::{CoreError, CoreResult};
use crate::ledger::{Ledger, RentDue};
use crate::maintenance::MaintenanceBook;
use crate::storage::{
    encode_records, ledger_warnings, load_records, Bucket, JsonStorage, LoadReport,
    PersistenceGateway, QuarantinedRecord,
};

/// Metadata describing the outcome of a load operation.
#[derive(Debug, Clone, Default)]
pub struct LoadMetadata {
    pub warnings: Vec<String>,
    /// Records set aside during this load.
    pub quarantined: usize,
    /// Whether reconciliation synthesized or refreshed any work order.
    pub reconciled: bool,
}

/// Facade that coordinates the ledger, the maintenance book and persistence.
///
/// Every mutation runs against a snapshot of the affected collection: when the
/// operation fails, or the collaborator rejects the save, the snapshot is put back
/// so memory never diverges from what was last persisted.
pub struct PropertyManager {
    ledger: Mutex<Ledger>,
    maintenance: Mutex<MaintenanceBook>,
    storage: Box<dyn PersistenceGateway>,
    clock: Box<dyn Clock>,
    config: Config,
}

impl PropertyManager {
    pub fn new(storage: Box<dyn PersistenceGateway>, config: Config) -> Self {
        Self {
            ledger: Mutex::new(Ledger::new()),
            maintenance: Mutex::new(MaintenanceBook::default()),
            storage,
            clock: Box::new(SystemClock),
            config,
        }
    }

    /// Opens the on-disk store under `root` (or the default application directory),
    /// reading `config.json` and loading every bucket.
    pub fn open(root: Option<PathBuf>) -> CoreResult<(Self, LoadMetadata)> {
        let base = PathResolver::resolve_base(root);
        let config = ConfigManager::with_base_dir(base.clone())?.load()?;
        let storage = JsonStorage::new(config.data_dir_in(&base))?;
        let manager = Self::new(Box::new(storage), config);
        let metadata = manager.load()?;
        Ok((manager, metadata))
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> &dyn PersistenceGateway {
        self.storage.as_ref()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Reads every bucket, quarantining what cannot be decoded, then reconciles the
    /// maintenance records. Unreadable data never fails the load; storage read
    /// errors do.
    pub fn load(&self) -> CoreResult<LoadMetadata> {
        let storage = self.storage.as_ref();
        let tenants = load_records::<Tenant>(storage, Bucket::Tenants)?;
        let payments = load_records::<Payment>(storage, Bucket::Payments)?;
        let charges = load_records::<Charge>(storage, Bucket::Charges)?;
        let submissions = load_records::<Submission>(storage, Bucket::TenantSubmissions)?;
        let work_orders = load_records::<WorkOrder>(storage, Bucket::WorkOrders)?;

        let mut cleaned = Vec::new();
        stage_cleaned(Bucket::Tenants, &tenants, &mut cleaned)?;
        stage_cleaned(Bucket::Payments, &payments, &mut cleaned)?;
        stage_cleaned(Bucket::Charges, &charges, &mut cleaned)?;
        stage_cleaned(Bucket::TenantSubmissions, &submissions, &mut cleaned)?;
        stage_cleaned(Bucket::WorkOrders, &work_orders, &mut cleaned)?;

        let mut metadata = LoadMetadata::default();
        let mut quarantined: Vec<QuarantinedRecord> = Vec::new();
        for (found, warnings) in [
            (tenants.quarantined, tenants.warnings),
            (payments.quarantined, payments.warnings),
            (charges.quarantined, charges.warnings),
            (submissions.quarantined, submissions.warnings),
            (work_orders.quarantined, work_orders.warnings),
        ] {
            quarantined.extend(found);
            metadata.warnings.extend(warnings);
        }
        metadata.quarantined = quarantined.len();
        if !quarantined.is_empty() {
            self.move_to_quarantine(quarantined, cleaned, &mut metadata.warnings)?;
        }

        let ledger = Ledger::from_parts(tenants.records, payments.records, charges.records);
        metadata.warnings.extend(ledger_warnings(&ledger));
        *self.lock_ledger()? = ledger;

        {
            let mut book = self.lock_maintenance()?;
            *book = MaintenanceBook::new(submissions.records, work_orders.records);
            let snapshot = book.clone();
            if MaintenanceService::reconcile(&mut book) {
                metadata.reconciled = true;
                if let Err(err) = self.persist_maintenance(&snapshot, &book) {
                    *book = snapshot;
                    tracing::warn!(error = %err, "reconciled work orders could not be saved");
                    metadata
                        .warnings
                        .push(format!("reconciled work orders were not saved: {err}"));
                }
            }
        }

        tracing::info!(
            warnings = metadata.warnings.len(),
            quarantined = metadata.quarantined,
            "property data loaded"
        );
        Ok(metadata)
    }

    // Tenants

    pub fn register_tenant(&self, tenant: Tenant) -> CoreResult<Tenant> {
        self.commit_ledger(|ledger| {
            let id = TenantService::register(ledger, tenant)?;
            TenantService::require(ledger, id).cloned()
        })
    }

    pub fn tenant(&self, id: Uuid) -> CoreResult<Tenant> {
        let ledger = self.lock_ledger()?;
        TenantService::require(&ledger, id).cloned()
    }

    pub fn tenants(&self) -> CoreResult<Vec<Tenant>> {
        Ok(self.lock_ledger()?.tenants.clone())
    }

    // Billing

    pub fn record_payment(
        &self,
        tenant_id: Uuid,
        amount: Decimal,
        concept: &str,
        settled_charge_ids: &[Uuid],
    ) -> CoreResult<Payment> {
        let now = self.clock.now();
        self.commit_ledger(|ledger| {
            BillingService::record_payment(
                ledger,
                tenant_id,
                amount,
                concept,
                settled_charge_ids,
                now,
            )
        })
    }

    pub fn record_rent_payment(
        &self,
        tenant_id: Uuid,
        amount: Decimal,
        concept: &str,
        period: RentPeriod,
        settled_charge_ids: &[Uuid],
    ) -> CoreResult<Payment> {
        let now = self.clock.now();
        self.commit_ledger(|ledger| {
            BillingService::record_rent_payment(
                ledger,
                tenant_id,
                amount,
                concept,
                period,
                settled_charge_ids,
                now,
            )
        })
    }

    /// Checkout from the tenant dashboard: next rent month plus the selected charges.
    pub fn pay_rent_and_charges(&self, request: &CheckoutRequest) -> CoreResult<Payment> {
        let now = self.clock.now();
        self.commit_ledger(|ledger| CheckoutService::pay(ledger, &self.config, request, now))
    }

    pub fn revert_payment(&self, payment_id: Uuid) -> CoreResult<Payment> {
        self.commit_ledger(|ledger| BillingService::revert_payment(ledger, payment_id))
    }

    pub fn reactivate_payment(&self, payment_id: Uuid) -> CoreResult<Payment> {
        self.commit_ledger(|ledger| BillingService::reactivate_payment(ledger, payment_id))
    }

    pub fn assign_charge(
        &self,
        tenant_id: Uuid,
        amount: Decimal,
        concept: &str,
    ) -> CoreResult<Charge> {
        let now = self.clock.now();
        self.commit_ledger(|ledger| {
            BillingService::assign_charge(ledger, tenant_id, amount, concept, now)
        })
    }

    pub fn set_charge_status(&self, charge_id: Uuid, status: ChargeStatus) -> CoreResult<Charge> {
        self.commit_ledger(|ledger| BillingService::set_charge_status(ledger, charge_id, status))
    }

    /// Payments, newest first. `None` lists every tenant.
    pub fn payments(&self, tenant_id: Option<Uuid>) -> CoreResult<Vec<Payment>> {
        let ledger = self.lock_ledger()?;
        let mut payments: Vec<Payment> = ledger
            .payments
            .iter()
            .filter(|payment| tenant_id.map_or(true, |id| payment.tenant_id == id))
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.paid_at.cmp(&a.paid_at));
        Ok(payments)
    }

    /// Charges, newest first. `None` lists every tenant.
    pub fn charges(&self, tenant_id: Option<Uuid>) -> CoreResult<Vec<Charge>> {
        let ledger = self.lock_ledger()?;
        let mut charges: Vec<Charge> = ledger
            .charges
            .iter()
            .filter(|charge| tenant_id.map_or(true, |id| charge.tenant_id == id))
            .cloned()
            .collect();
        charges.sort_by(|a, b| b.assigned_at.cmp(&a.assigned_at));
        Ok(charges)
    }

    pub fn charges_settled_by(&self, payment_id: Uuid) -> CoreResult<Vec<Charge>> {
        let ledger = self.lock_ledger()?;
        Ok(ledger
            .charges_settled_by(payment_id)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn ledger_warnings(&self) -> CoreResult<Vec<String>> {
        let ledger = self.lock_ledger()?;
        Ok(ledger_warnings(&ledger))
    }

    // Summaries

    pub fn totals(&self, tenant_id: Uuid) -> CoreResult<LedgerTotals> {
        let ledger = self.lock_ledger()?;
        Ok(SummaryService::totals(&ledger, tenant_id, self.clock.today()))
    }

    pub fn next_payable_month(&self, tenant_id: Uuid) -> CoreResult<Option<NaiveDate>> {
        let ledger = self.lock_ledger()?;
        SummaryService::next_payable_month(&ledger, tenant_id, self.clock.today())
    }

    pub fn rent_status(&self, tenant_id: Uuid) -> CoreResult<RentDue> {
        let ledger = self.lock_ledger()?;
        SummaryService::rent_due(
            &ledger,
            tenant_id,
            self.clock.today(),
            self.config.monthly_rent,
        )
    }

    pub fn portfolio_summary(&self) -> CoreResult<PortfolioSummary> {
        let ledger = self.lock_ledger()?;
        Ok(SummaryService::portfolio(&ledger, self.clock.today()))
    }

    // Maintenance

    pub fn submit_request(&self, tenant_id: Uuid, request: NewRequest) -> CoreResult<Submission> {
        let tenant = self.tenant(tenant_id)?;
        let now = self.clock.now();
        self.commit_maintenance(|book| {
            MaintenanceService::submit_request(book, &tenant, request, now)
        })
    }

    pub fn submit_rating(
        &self,
        request_id: Uuid,
        rating: u8,
        comment: Option<String>,
    ) -> CoreResult<()> {
        self.commit_maintenance(|book| {
            MaintenanceService::submit_rating(book, request_id, rating, comment)
        })
    }

    /// A tenant's requests with the status projected from the manager's work order.
    pub fn tenant_requests(&self, tenant_id: Uuid) -> CoreResult<Vec<Submission>> {
        let book = self.lock_maintenance()?;
        let mut requests = book.tenant_requests(tenant_id);
        requests.sort_by(|a, b| b.date_submitted.cmp(&a.date_submitted));
        Ok(requests)
    }

    /// Reconciles, then lists every work order.
    pub fn work_orders(&self) -> CoreResult<Vec<WorkOrder>> {
        self.commit_maintenance(|book| {
            MaintenanceService::reconcile(book);
            Ok(book.work_orders.clone())
        })
    }

    pub fn update_work_order(&self, id: Uuid, update: WorkOrderUpdate) -> CoreResult<WorkOrder> {
        self.commit_maintenance(|book| MaintenanceService::update_work_order(book, id, update))
    }

    // Transactions

    fn lock_ledger(&self) -> CoreResult<MutexGuard<'_, Ledger>> {
        self.ledger
            .lock()
            .map_err(|_| CoreError::Persistence("ledger lock poisoned".into()))
    }

    fn lock_maintenance(&self) -> CoreResult<MutexGuard<'_, MaintenanceBook>> {
        self.maintenance
            .lock()
            .map_err(|_| CoreError::Persistence("maintenance lock poisoned".into()))
    }

    fn commit_ledger<T>(&self, op: impl FnOnce(&mut Ledger) -> CoreResult<T>) -> CoreResult<T> {
        let mut ledger = self.lock_ledger()?;
        let snapshot = ledger.clone();
        let outcome = op(&mut ledger).and_then(|value| {
            self.persist_ledger(&snapshot, &ledger)?;
            Ok(value)
        });
        if outcome.is_err() {
            *ledger = snapshot;
        }
        outcome
    }

    fn commit_maintenance<T>(
        &self,
        op: impl FnOnce(&mut MaintenanceBook) -> CoreResult<T>,
    ) -> CoreResult<T> {
        let mut book = self.lock_maintenance()?;
        let snapshot = book.clone();
        let outcome = op(&mut book).and_then(|value| {
            self.persist_maintenance(&snapshot, &book)?;
            Ok(value)
        });
        if outcome.is_err() {
            *book = snapshot;
        }
        outcome
    }

    /// Saves the ledger buckets that differ from `before` in one batch.
    fn persist_ledger(&self, before: &Ledger, after: &Ledger) -> CoreResult<()> {
        let mut batch = Vec::new();
        if before.tenants != after.tenants {
            batch.push((Bucket::Tenants, encode_records(&after.tenants)?));
        }
        if before.payments != after.payments {
            batch.push((Bucket::Payments, encode_records(&after.payments)?));
        }
        if before.charges != after.charges {
            batch.push((Bucket::Charges, encode_records(&after.charges)?));
        }
        self.save_batch(batch)
    }

    fn persist_maintenance(
        &self,
        before: &MaintenanceBook,
        after: &MaintenanceBook,
    ) -> CoreResult<()> {
        let mut batch = Vec::new();
        if before.submissions != after.submissions {
            batch.push((Bucket::TenantSubmissions, encode_records(&after.submissions)?));
        }
        if before.work_orders != after.work_orders {
            batch.push((Bucket::WorkOrders, encode_records(&after.work_orders)?));
        }
        self.save_batch(batch)
    }

    fn save_batch(&self, batch: Vec<(Bucket, String)>) -> CoreResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let buckets: Vec<&'static str> = batch.iter().map(|(bucket, _)| bucket.name()).collect();
        match self.storage.save_all(&batch) {
            Ok(()) => {
                tracing::info!(buckets = ?buckets, "changes committed");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(buckets = ?buckets, error = %err, "save failed; rolling back");
                Err(err)
            }
        }
    }

    /// Appends `found` to the quarantine bucket and rewrites the source buckets
    /// without the unreadable records, all in one batch. When the batch fails the
    /// sources keep their records, so the next load quarantines them again instead
    /// of losing them.
    fn move_to_quarantine(
        &self,
        mut found: Vec<QuarantinedRecord>,
        cleaned: Vec<(Bucket, String)>,
        warnings: &mut Vec<String>,
    ) -> CoreResult<()> {
        let mut existing =
            load_records::<QuarantinedRecord>(self.storage.as_ref(), Bucket::Quarantine)?;
        warnings.append(&mut existing.warnings);
        // An unreadable quarantine payload is kept as an entry of its own.
        existing.records.append(&mut existing.quarantined);
        existing.records.append(&mut found);

        let mut batch = vec![(Bucket::Quarantine, encode_records(&existing.records)?)];
        batch.extend(cleaned);
        if let Err(err) = self.storage.save_all(&batch) {
            tracing::warn!(error = %err, "quarantined records could not be saved");
            warnings.push(format!("quarantined records were not saved: {err}"));
        }
        Ok(())
    }
}

/// Queues a rewrite of `bucket` holding only its readable records, if any were
/// set aside.
fn stage_cleaned<T: Serialize>(
    bucket: Bucket,
    report: &LoadReport<T>,
    batch: &mut Vec<(Bucket, String)>,
) -> CoreResult<()> {
    if !report.quarantined.is_empty() {
        batch.push((bucket, encode_records(&report.records)?));
    }
    Ok(())
}
