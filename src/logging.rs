//! Logger bootstrap for the binary and tests.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger.
///
/// When `verbose` is `true`, all debug messages are printed, including the
/// ownership-gated no-ops logged by the damage and replication systems.
/// Otherwise only info level and above are shown. `RUST_LOG` overrides both.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);

    // `try_init` only fails if a logger was already set, so repeated calls
    // from tests keep the first logger.
    if builder.try_init().is_err() {
        log::debug!("logger already initialised");
    }
}
