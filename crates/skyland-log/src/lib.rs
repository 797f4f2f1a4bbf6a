//! Structured logging for the skyland generator.
//!
//! Installs a `tracing` subscriber with a console layer and, when a log
//! directory is given, a JSON file layer. The level comes from `RUST_LOG` if
//! set, else from the config's `debug.log_level`.

use std::path::Path;

use skyland_config::Config;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config provide one.
pub const DEFAULT_FILTER: &str = "info";

/// Name of the JSON log file written into the log directory.
pub const LOG_FILE_NAME: &str = "skyland.log";

/// Install the global tracing subscriber.
///
/// # Arguments
///
/// * `log_dir` - Optional directory for a JSON log file
/// * `config` - Optional configuration supplying the log level
///
/// # Errors
///
/// Returns [`TryInitError`] if a global subscriber is already installed.
///
/// # Examples
///
/// ```no_run
/// use skyland_config::Config;
/// use skyland_log::init_logging;
///
/// let config = Config::default();
/// init_logging(None, Some(&config)).expect("subscriber already set");
/// ```
pub fn init_logging(log_dir: Option<&Path>, config: Option<&Config>) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config)));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true) // shaping workers are named
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        return subscriber.with(file_layer).try_init();
    }

    subscriber.try_init()
}

/// The filter directive derived from the config, falling back to
/// [`DEFAULT_FILTER`] when the config is absent or its level is blank.
pub fn filter_directive(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.trim().is_empty() => {
            config.debug.log_level.trim().to_string()
        }
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Create an `EnvFilter` with [`DEFAULT_FILTER`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}
