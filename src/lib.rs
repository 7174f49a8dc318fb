#![doc(test(attr(deny(warnings))))]

//! Rentdesk Core keeps the rent ledger and maintenance records of a small
//! property: payments and charges per tenant, the next rent month due, and the
//! reconciliation of tenant requests with the manager's work orders.

pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod maintenance;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use crate::core::{LoadMetadata, PropertyManager};
pub use config::Config;
pub use errors::{CoreError, CoreResult};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with the crate default filter and logs the build.
pub fn init() {
    init_with_filter(None);
}

/// Like [`init`], using `filter` (for example `Config::log_filter`) as the default
/// directive.
pub fn init_with_filter(filter: Option<&str>) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(filter);
        let build = utils::build_info::current();
        tracing::info!(
            version = build.version,
            git = build.git_hash,
            status = build.git_status,
            built = build.timestamp,
            profile = build.profile,
            "Rentdesk Core tracing initialized."
        );
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
