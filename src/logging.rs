//! Log output for the binaries.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs a subscriber writing to stderr, filtered by `RUST_LOG`
/// (default: `warn`).
///
/// Library code logs through the `log` facade; the subscriber bridges those
/// records, so stdout only carries program output.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
