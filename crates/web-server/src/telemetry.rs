use anyhow::Context;
use configuration::{LogFormat, Logging};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// File name prefix for the daily rolling log under `logging.directory`.
pub const LOG_FILE_PREFIX: &str = "dashboard.log";

/// Installs the global subscriber described by `logging`.
///
/// `RUST_LOG` wins over `logging.level`. When a directory is configured the
/// returned guard must be held until exit, or buffered file logs are lost.
pub fn init_tracing(logging: &Logging) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level)
            .with_context(|| format!("Invalid log level '{}'", logging.level))?,
    };

    let console = match logging.format {
        LogFormat::Full => fmt::layer().boxed(),
        LogFormat::Compact => fmt::layer().compact().boxed(),
    };

    let (file, guard) = match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    Ok(guard)
}
