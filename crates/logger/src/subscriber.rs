use std::env::var;
use std::io::stderr;

use tracing::{level_filters::LevelFilter, warn};
use tracing_subscriber::{Layer, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing, raising the default level once per `-v`.
///
/// `RUST_LOG` still takes precedence over the verbosity flag.
pub fn init(verbosity: u8) {
    initialize_tracing(level_for_verbosity(verbosity));
}

pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Logs go to stderr, stdout is reserved for the availability report.
fn initialize_tracing(level: LevelFilter) {
    let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

    let log_format = var("RUST_LOG_FORMAT");

    let log_layer = match log_format.as_deref() {
        Ok("json") => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(stderr)
            .with_filter(env_filter)
            .boxed(),
        _ => tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_writer(stderr)
            .with_filter(env_filter)
            .boxed(),
    };

    tracing_subscriber::registry().with(log_layer).init();

    if let Err(error) = log_format {
        if !matches!(error, std::env::VarError::NotPresent) {
            warn!("Failed to read RUST_LOG_FORMAT, falling back to default: {error}");
        }
    }
}
