use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize console-only logging.
///
/// Used when file logging cannot be set up (for example, the log directory
/// is not writable) and by tools that never write log files.
///
/// # Configuration
///
/// - **Log Level**: `RUST_LOG` wins; otherwise `level` (e.g. `"info"`)
/// - **Filtering**: Noisy dependencies filtered to warn level
/// - **Format**: Compact format with ANSI colors
///
/// Calling this after a subscriber is already installed is a no-op.
pub fn init_basic_console_logging(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(true)
        .with_filter(env_filter);

    if tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .is_ok()
    {
        // Printed to stderr, bypasses the logging system
        eprintln!("Console logging only ({level})");
    }
}

/// Filter directives: the configured level plus quieter HTTP internals.
pub(crate) fn default_directives(level: &str) -> String {
    format!("{level},tower_http=warn,hyper=warn,h2=warn")
}
