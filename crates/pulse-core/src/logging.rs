//! Structured logging with `tracing`.
//!
//! The pipeline emits `tracing` events at each stage (file loaded, rows
//! parsed, columns normalized, KPIs computed, prompt built, chat completed).
//! Binaries call [`init_subscriber`] once at startup.

/// Initialize the global tracing subscriber with stderr output.
///
/// `RUST_LOG` takes precedence over `level` when set. Subsequent calls are
/// no-ops.
///
/// # Arguments
///
/// * `level` - Minimum log level to display, e.g. `"info"` or `"pulse_ingest=debug"`.
pub fn init_subscriber(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    // A second call finds the global dispatcher taken; keep the first one.
    let _ = subscriber.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_subscriber_does_not_panic() {
        init_subscriber("warn");
        init_subscriber("debug");
    }
}
