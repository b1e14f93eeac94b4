//! Logging setup
//!
//! `RUST_LOG` takes precedence over the configured level.

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use socratic_core::config::LoggingSettings;

/// Install the global subscriber
///
/// The returned guards flush buffered lines on drop and must live until
/// shutdown.
pub fn init_logging(settings: &LoggingSettings) -> Result<Vec<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .with_context(|| format!("Invalid log level {:?}", settings.level))?;

    let mut guards = Vec::new();

    let (stdout, guard) = tracing_appender::non_blocking(std::io::stdout());
    guards.push(guard);

    let file_writer = settings.directory.as_ref().map(|dir| {
        let appender = tracing_appender::rolling::daily(dir, "socratic.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        guards.push(guard);
        writer
    });

    let registry = tracing_subscriber::registry().with(filter);

    if settings.json {
        registry
            .with(fmt::layer().json().with_writer(stdout))
            .with(file_writer.map(|w| fmt::layer().json().with_ansi(false).with_writer(w)))
            .try_init()
            .context("Failed to initialize logging")?;
    } else {
        registry
            .with(fmt::layer().with_writer(stdout))
            .with(file_writer.map(|w| fmt::layer().with_ansi(false).with_writer(w)))
            .try_init()
            .context("Failed to initialize logging")?;
    }

    Ok(guards)
}
