//! Logging initialization.
//!
//! Events go to stderr so they never interleave with reports on stdout or with
//! the TUI's alternate screen. `RUST_LOG` takes precedence over `-v`.

use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

pub fn init_logging(verbose: bool) {
    let level = if verbose { "hvac_pricing=debug" } else { "off" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // `try_init` so a second call (tests, embedding) is a no-op instead of a panic.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).without_time())
        .with(filter)
        .try_init();
}
