#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use rentdesk_core::{
    config::{Config, ConfigManager},
    core::{FixedClock, PropertyManager},
    domain::Tenant,
    storage::{JsonStorage, MemoryStorage},
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap()
}

pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Manager backed by JSON files in a fresh directory, with its config manager.
pub fn setup_test_env() -> (PropertyManager, ConfigManager, PathBuf) {
    let base = temp_base();
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    let storage = JsonStorage::new(base.join("data")).expect("create json storage backend");
    let manager = PropertyManager::new(Box::new(storage), Config::default())
        .with_clock(Box::new(FixedClock(fixed_now())));
    (manager, config_manager, base)
}

/// Manager backed by shared in-memory storage, so tests can inject save failures.
pub fn memory_manager() -> (PropertyManager, Arc<MemoryStorage>) {
    memory_manager_with(Arc::new(MemoryStorage::new()))
}

pub fn memory_manager_with(storage: Arc<MemoryStorage>) -> (PropertyManager, Arc<MemoryStorage>) {
    let manager = PropertyManager::new(Box::new(storage.clone()), Config::default())
        .with_clock(Box::new(FixedClock(fixed_now())));
    (manager, storage)
}

pub fn register(manager: &PropertyManager, name: &str, unit: &str) -> Tenant {
    manager
        .register_tenant(Tenant::new(name, unit))
        .expect("register tenant")
}
