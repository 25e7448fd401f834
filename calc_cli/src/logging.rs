//! Logging setup
//!
//! Events go to stderr so the JSON report on stdout stays machine-readable.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber
///
/// `RUST_LOG` selects the filter (default: `info`), e.g.
/// `RUST_LOG=calc_core=debug` to trace every evaluated combination.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}
