//! Logging settings, read from the `[log_settings]` table.

use serde::Deserialize;

/// How often the log file rolls over.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Never,
}

/// Console and file logging configuration.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogSettings {
    /// Base name of the log file, e.g. `logs/app.log`.
    pub app_name: String,

    /// Minimum level (`TRACE`, `DEBUG`, `INFO`, `WARN`, `ERROR`).
    pub level: String,

    /// Directory the log files are written to.
    pub directory: String,

    pub rotation: Rotation,

    /// Number of rotated files kept before the oldest is deleted.
    pub retention: usize,

    /// Write the file log as JSON lines.
    pub serialize: bool,

    /// ANSI colors on the console.
    pub colorize: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            app_name: "app".to_string(),
            level: "INFO".to_string(),
            directory: "logs".to_string(),
            rotation: Rotation::Daily,
            retention: 7,
            serialize: false,
            colorize: true,
        }
    }
}

impl LogSettings {
    /// Level as a lowercase filter directive, e.g. `info`.
    pub fn level_directive(&self) -> String {
        self.level.trim().to_ascii_lowercase()
    }

    pub fn file_name(&self) -> String {
        format!("{}.log", self.app_name)
    }
}
