use std::path::PathBuf;

use crate::domain::models::SuvConfig;

/// Logger settings, derived from the `logging` section of a project config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Default level (trace, debug, info, warn, error); `RUST_LOG` wins
    pub level: String,

    pub format: LogFormat,

    /// Directory for rolling JSON log files; `None` disables file output
    pub dir: Option<PathBuf>,

    /// Write human-facing output to stderr
    pub stderr: bool,

    pub rotation: RotationPolicy,
}

/// Format of the stderr output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    /// Accepted spellings, in the order they are listed in errors.
    pub const NAMES: [&'static str; 2] = ["json", "pretty"];

    /// Parse a format name, ignoring case.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// How often the log file is rolled over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}

impl RotationPolicy {
    pub const NAMES: [&'static str; 3] = ["daily", "hourly", "never"];

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "hourly" => Some(Self::Hourly),
            "never" => Some(Self::Never),
            _ => None,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            dir: None,
            stderr: true,
            rotation: RotationPolicy::default(),
        }
    }
}

impl From<&SuvConfig> for LogConfig {
    /// Unknown format or rotation names fall back to the defaults; the
    /// config processor has already rejected them for processed configs.
    fn from(config: &SuvConfig) -> Self {
        let logging = &config.logging;
        Self {
            level: logging.level.clone(),
            format: LogFormat::parse(&logging.format).unwrap_or_default(),
            dir: config.log_dir_path(),
            stderr: logging.stderr,
            rotation: RotationPolicy::parse(&logging.rotation).unwrap_or_default(),
        }
    }
}
