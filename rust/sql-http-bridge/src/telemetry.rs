use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

/// Used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info,tower_http=debug";

static INIT: OnceCell<()> = OnceCell::new();

/// Installs the global subscriber once; later calls, and calls after another subscriber
/// was installed (as in tests), are no-ops.
pub fn init_tracing() {
    INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let _ = fmt().with_env_filter(filter).with_target(false).try_init();
    });
}
