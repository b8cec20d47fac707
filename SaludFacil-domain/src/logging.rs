//! Tracing setup for embedding applications and test harnesses.

use std::sync::Once;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

static INIT: Once = Once::new();

/// Initialize structured logging: a fmt layer on stdout with an
/// `EnvFilter` from the environment, defaulting to `info`. Safe to call
/// more than once; only the first call installs the subscriber.
pub fn init_tracing() {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_span_events(FmtSpan::CLOSE)
                    .with_target(false)
                    .with_ansi(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stdout),
            )
            .with(env_filter)
            .init();
    });
}
