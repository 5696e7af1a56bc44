//! Logging setup
//!
//! Diagnostics go to stderr through `tracing`; command output stays on stdout.

use tracing_subscriber::EnvFilter;

use crate::config::LOG_ENV_VAR;

/// Install the global subscriber
///
/// `WOM_LOG` takes precedence; otherwise `--verbose` selects `debug` and the
/// default is `warn`.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
