use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{Map, Value};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{debug, info, instrument};

use super::module;
use super::processor::{process_config, ProcessContext};
use crate::domain::models::SuvConfig;
use crate::domain::{ConfigError, ConfigResult};

/// Name of the configuration module looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "suv.config.js";

/// Prefix of environment variables layered over the config module.
pub const DEFAULT_ENV_PREFIX: &str = "SUV_";

static LAST_LOAD_ID: AtomicU64 = AtomicU64::new(0);

/// Options for [`load_config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Directory holding `suv.config.js`
    pub cwd: PathBuf,

    /// Prefix for environment overrides; `None` disables them
    pub env_prefix: Option<String>,
}

impl LoadOptions {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            env_prefix: Some(DEFAULT_ENV_PREFIX.to_string()),
        }
    }

    #[must_use]
    pub fn with_env_prefix(mut self, prefix: Option<&str>) -> Self {
        self.env_prefix = prefix.map(str::to_string);
        self
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }
}

/// A freshly evaluated config module.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModule {
    pub path: PathBuf,
    /// Strictly increasing across loads in this process
    pub load_id: u64,
    pub default_export: Value,
}

/// Loader for `suv.config.js`.
///
/// Nothing is cached: every call opens, reads and evaluates the file again,
/// so repeated loads observe edits made on disk in between.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load, validate and finalize the configuration under `options.cwd`.
    ///
    /// A missing or unreadable config file is not an error; the configuration
    /// is then built from defaults.
    pub async fn load(options: &LoadOptions) -> ConfigResult<SuvConfig> {
        let raw = Self::load_raw(&options.cwd).await?;
        let config = process_config(raw, &ProcessContext::from(options))?;

        info!(
            cwd = %options.cwd.display(),
            root = %config.root,
            out_dir = %config.out_dir,
            "configuration loaded"
        );
        Ok(config)
    }

    /// The unvalidated default export, or an empty object when the config
    /// file is not accessible.
    pub async fn load_raw(cwd: &Path) -> ConfigResult<Value> {
        Ok(Self::import(cwd)
            .await?
            .map_or_else(|| Value::Object(Map::new()), |module| module.default_export))
    }

    /// Evaluate the config module under `cwd`; `None` when it cannot be
    /// opened for reading.
    #[instrument(skip_all, fields(path = tracing::field::Empty, load_id = tracing::field::Empty))]
    pub async fn import(cwd: &Path) -> ConfigResult<Option<LoadedModule>> {
        let path = config_path(cwd);
        tracing::Span::current().record("path", tracing::field::display(path.display()));

        let mut file = match File::open(&path).await {
            Ok(file) => file,
            Err(err) => {
                debug!(error = %err, "config file not accessible, using empty configuration");
                return Ok(None);
            }
        };

        let load_id = next_load_id();
        tracing::Span::current().record("load_id", load_id);

        let mut source = String::new();
        file.read_to_string(&mut source)
            .await
            .map_err(|err| load_error(&path, err))?;

        let default_export = module::evaluate(&source).map_err(|err| load_error(&path, err))?;
        debug!(bytes = source.len(), "config module evaluated");

        Ok(Some(LoadedModule {
            path,
            load_id,
            default_export,
        }))
    }
}

/// Load the configuration described by `options`.
pub async fn load_config(options: LoadOptions) -> ConfigResult<SuvConfig> {
    ConfigLoader::load(&options).await
}

/// Location of the config module for a working directory.
pub fn config_path(cwd: &Path) -> PathBuf {
    cwd.join(CONFIG_FILE_NAME)
}

/// Next load discriminator: the current time in milliseconds, bumped past
/// the previous id when the clock has not advanced.
pub fn next_load_id() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX));

    let previous = LAST_LOAD_ID
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
            Some(now.max(last.saturating_add(1)))
        })
        .unwrap_or_else(|last| last);
    now.max(previous.saturating_add(1))
}

fn load_error(path: &Path, err: impl std::fmt::Display) -> ConfigError {
    ConfigError::Load {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}
