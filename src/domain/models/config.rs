use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Finalized configuration for a suv project.
///
/// Built by the config processor from the validated option tree; every
/// recognized option is present. Options the schema does not recognize are
/// kept in `extra` for plugins that define their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SuvConfig {
    /// Source root, relative to `cwd` unless absolute
    pub root: String,

    /// Build output directory
    pub out_dir: String,

    /// Public base path the site is served under
    pub base: String,

    /// Directory of static assets copied verbatim
    pub public_dir: String,

    /// Dev server options
    pub dev: DevConfig,

    /// Build options
    pub build: BuildConfig,

    /// Logging options
    pub logging: LoggingConfig,

    /// Undeclared options, passed through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// Working directory the configuration was resolved against
    #[serde(skip)]
    pub cwd: PathBuf,
}

impl SuvConfig {
    pub fn root_dir(&self) -> PathBuf {
        self.resolve(&self.root)
    }

    pub fn out_dir_path(&self) -> PathBuf {
        self.resolve(&self.out_dir)
    }

    pub fn public_dir_path(&self) -> PathBuf {
        self.resolve(&self.public_dir)
    }

    /// Log file directory, when file logging is configured.
    pub fn log_dir_path(&self) -> Option<PathBuf> {
        self.logging.dir.as_deref().map(|dir| self.resolve(dir))
    }

    fn resolve(&self, dir: &str) -> PathBuf {
        let dir = Path::new(dir);
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.cwd.join(dir)
        }
    }
}

/// Dev server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DevConfig {
    pub host: String,
    pub port: u16,
    /// Open a browser once the server is listening
    pub open: bool,
}

/// Build configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BuildConfig {
    pub minify: bool,
    pub sourcemap: bool,
    /// Chunk size in kB above which the build warns
    pub chunk_size_warning_limit: f64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log format: json or pretty
    pub format: String,

    /// Directory for rolling log files; unset disables file output
    pub dir: Option<String>,

    /// Log file rotation: daily, hourly or never
    pub rotation: String,

    pub stderr: bool,
}
