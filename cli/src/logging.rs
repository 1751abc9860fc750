//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Default filter for a given `-v` count. `RUST_LOG` takes precedence.
#[must_use]
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "powercli_offline=info,warn",
        _ => "powercli_offline=debug,info",
    }
}

/// Install the global subscriber, writing to stderr so status output on
/// stdout stays clean.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
