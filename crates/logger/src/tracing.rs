use std::env::var;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{Layer, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing at the default `INFO` level.
pub fn init() {
    initialize_tracing(LevelFilter::INFO);
}

/// Initialize the global tracing subscriber.
///
/// Records go to stderr so stdout stays reserved for the monitor report.
/// `RUST_LOG` overrides `level`; `RUST_LOG_FORMAT=json` selects JSON output.
/// Calling this twice is a no-op.
fn initialize_tracing(level: LevelFilter) {
    let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

    let log_format = var("RUST_LOG_FORMAT").unwrap_or_default();

    let log_layer = match log_format.as_str() {
        "json" => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(env_filter)
            .boxed(),
        _ => tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_writer(std::io::stderr)
            .with_filter(env_filter)
            .boxed(),
    };

    let _ = tracing_subscriber::registry().with(log_layer).try_init();
}
