pub mod build_info;

use std::sync::Once;

use tracing_subscriber::filter::Directive;

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "rentdesk_core=info";

/// Initializes the global tracing subscriber. `RUST_LOG` wins over `filter`, which
/// wins over the crate default.
pub fn init_tracing(filter: Option<&str>) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let directive = filter
            .and_then(|raw| raw.parse::<Directive>().ok())
            .or_else(|| DEFAULT_DIRECTIVE.parse().ok());
        let mut env_filter = EnvFilter::from_default_env();
        if let Some(directive) = directive {
            env_filter = env_filter.add_directive(directive);
        }

        let _ = fmt().with_env_filter(env_filter).try_init();
    });
}
