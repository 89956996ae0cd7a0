//! ui::logging
//!
//! Diagnostic logging setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::output::Verbosity;

/// Install a stderr `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level follows `verbosity`.
/// Installing twice is a no-op.
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity == Verbosity::Debug)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
