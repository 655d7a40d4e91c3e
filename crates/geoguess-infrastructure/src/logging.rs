//! Tracing subscriber setup for geoguess binaries.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "info";
const LOG_FILE_PREFIX: &str = "geoguess.log";

/// Installs the global subscriber: stderr plus a daily-rolling file in `log_dir`.
///
/// The filter honours `RUST_LOG` and defaults to `info`. Keep the returned
/// guard alive for the lifetime of the process so buffered lines are flushed.
/// Returns `None` for the guard when no log directory is available.
pub fn init_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    if let Err(e) = result {
        eprintln!("tracing subscriber already installed: {}", e);
    }

    guard
}
