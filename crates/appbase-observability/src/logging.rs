use std::fs;

use appbase_config::{LogSettings, Rotation};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{self, RollingFileAppender};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::basic_logging::{default_directives, init_basic_console_logging};

/// Installs the global subscriber: console plus a rolling log file.
///
/// `RUST_LOG` takes precedence over `settings.level`. The returned guard
/// flushes the file writer when dropped, so keep it alive for the life of
/// the process. Falls back to console-only logging and returns `None` when
/// the log directory or file cannot be created.
pub fn init_logging(settings: &LogSettings) -> Option<WorkerGuard> {
    let level = settings.level_directive();

    if let Err(e) = fs::create_dir_all(&settings.directory) {
        init_basic_console_logging(&level);
        tracing::warn!(
            directory = %settings.directory,
            error = %e,
            "Failed to create log directory, file logging disabled"
        );
        return None;
    }

    let appender = match RollingFileAppender::builder()
        .rotation(rotation(settings.rotation))
        .filename_prefix(&settings.app_name)
        .filename_suffix("log")
        .max_log_files(settings.retention.max(1))
        .build(&settings.directory)
    {
        Ok(appender) => appender,
        Err(e) => {
            init_basic_console_logging(&level);
            tracing::warn!(error = %e, "Failed to open log file, file logging disabled");
            return None;
        }
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&level)));

    let console_layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(settings.colorize);

    let file_layer = if settings.serialize {
        fmt::layer()
            .json()
            .with_writer(writer)
            .with_current_span(true)
            .with_span_list(true)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .boxed()
    };

    match tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
    {
        Ok(()) => {
            info!(
                directory = %settings.directory,
                file = %settings.file_name(),
                level = %level,
                "Logging initialized"
            );
        }
        Err(e) => eprintln!("Logging already initialized: {e}"),
    }

    Some(guard)
}

fn rotation(rotation: Rotation) -> rolling::Rotation {
    match rotation {
        Rotation::Minutely => rolling::Rotation::MINUTELY,
        Rotation::Hourly => rolling::Rotation::HOURLY,
        Rotation::Daily => rolling::Rotation::DAILY,
        Rotation::Never => rolling::Rotation::NEVER,
    }
}
