use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use crate::errors::{CoreError, CoreResult};

use super::{Bucket, PersistenceGateway};

/// In-process storage, handy for tests and ephemeral sessions.
///
/// Saves to buckets marked with [`MemoryStorage::fail_saves_for`] are rejected, which
/// lets callers exercise rollback paths.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    buckets: Mutex<HashMap<Bucket, String>>,
    failing: Mutex<HashSet<Bucket>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bucket(self, bucket: Bucket, payload: impl Into<String>) -> Self {
        if let Ok(mut buckets) = self.buckets.lock() {
            buckets.insert(bucket, payload.into());
        }
        self
    }

    pub fn fail_saves_for(&self, bucket: Bucket) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.insert(bucket);
        }
    }

    pub fn clear_failures(&self) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.clear();
        }
    }

    pub fn contents(&self, bucket: Bucket) -> Option<String> {
        self.buckets
            .lock()
            .ok()
            .and_then(|buckets| buckets.get(&bucket).cloned())
    }

    fn check_writable(&self, bucket: Bucket) -> CoreResult<()> {
        let failing = self
            .failing
            .lock()
            .map_err(|_| CoreError::Persistence("memory storage lock poisoned".into()))?;
        if failing.contains(&bucket) {
            return Err(CoreError::Persistence(format!(
                "bucket `{bucket}` rejected the write"
            )));
        }
        Ok(())
    }
}

impl PersistenceGateway for MemoryStorage {
    fn load(&self, bucket: Bucket) -> CoreResult<Option<String>> {
        let buckets = self
            .buckets
            .lock()
            .map_err(|_| CoreError::Persistence("memory storage lock poisoned".into()))?;
        Ok(buckets.get(&bucket).cloned())
    }

    fn save(&self, bucket: Bucket, payload: &str) -> CoreResult<()> {
        self.save_all(&[(bucket, payload.to_string())])
    }

    fn save_all(&self, batch: &[(Bucket, String)]) -> CoreResult<()> {
        for (bucket, _) in batch {
            self.check_writable(*bucket)?;
        }
        let mut buckets = self
            .buckets
            .lock()
            .map_err(|_| CoreError::Persistence("memory storage lock poisoned".into()))?;
        for (bucket, payload) in batch {
            buckets.insert(*bucket, payload.clone());
        }
        Ok(())
    }
}
