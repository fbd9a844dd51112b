//! Log output for tests
//!
//! Installs a `tracing` subscriber once per test binary. `RUST_LOG` wins;
//! otherwise the level comes from `BookkeepingConfig::log_level`.

use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

use core_kernel::BookkeepingConfig;

static TRACING: Lazy<()> = Lazy::new(|| {
    let log_level = BookkeepingConfig::from_env()
        .map(|config| config.log_level)
        .unwrap_or_else(|_| BookkeepingConfig::default().log_level);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Another subscriber may already be installed by the test harness
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_test_writer()
        .try_init();

    ::tracing::debug!(%log_level, "Test tracing initialised");
});

/// Initialises test logging; safe to call from every test
pub fn init_tracing() {
    Lazy::force(&TRACING);
}
