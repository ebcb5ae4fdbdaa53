//! Turns a raw default export into a finalized [`SuvConfig`].
//!
//! Processing order:
//! 1. Top-level shape guard ([`validate_config`])
//! 2. Environment overrides (`SUV_*`, `__` separates nesting levels)
//! 3. Root schema ([`root_schema`]): defaults, coercion, type checks
//! 4. Typed extraction and semantic checks

use std::path::PathBuf;

use figment::providers::{Env, Serialized};
use figment::util::nest;
use figment::value::Value as FigmentValue;
use figment::Figment;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use super::loader::LoadOptions;
use crate::domain::models::{Keypath, SuvConfig};
use crate::domain::{value_kind, ConfigError, ConfigResult, ValidationError};
use crate::infrastructure::logging::{LogFormat, RotationPolicy};
use crate::infrastructure::validators::{boolean, integer, number, object, string, Schema, Validator};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Context the raw configuration is processed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessContext {
    /// Working directory relative paths resolve against
    pub cwd: PathBuf,

    /// Prefix for environment overrides; `None` disables them
    pub env_prefix: Option<String>,
}

impl ProcessContext {
    /// Context without environment overrides.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            env_prefix: None,
        }
    }

    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }
}

impl From<&LoadOptions> for ProcessContext {
    fn from(options: &LoadOptions) -> Self {
        Self {
            cwd: options.cwd.clone(),
            env_prefix: options.env_prefix.clone(),
        }
    }
}

/// Options recognized in `suv.config.js`.
pub fn root_schema() -> Schema {
    Schema::new()
        .field("root", string(Some("src"), false))
        .field("out_dir", string(Some("dist"), false))
        .field("base", string(Some("/"), true))
        .field("public_dir", string(Some("public"), true))
        .field(
            "dev",
            object(
                Schema::new()
                    .field("host", string(Some("localhost"), false))
                    .field("port", integer(Some(5173)).range(0, i64::from(u16::MAX)))
                    .field("open", boolean(Some(false))),
            ),
        )
        .field(
            "build",
            object(
                Schema::new()
                    .field("minify", boolean(Some(true)))
                    .field("sourcemap", boolean(Some(false)))
                    .field("chunk_size_warning_limit", number(Some(500.0))),
            ),
        )
        .field(
            "logging",
            object(
                Schema::new()
                    .field("level", string(Some("info"), false))
                    .field("format", string(Some("pretty"), false))
                    .field("dir", string(None, false))
                    .field("rotation", string(Some("daily"), false))
                    .field("stderr", boolean(Some(true))),
            ),
        )
}

/// Top-level guard: the default export must be an object. Field-level
/// checks are left to [`process_config`].
pub fn validate_config(raw: Value) -> ConfigResult<Map<String, Value>> {
    match raw {
        Value::Object(map) => Ok(map),
        other => Err(ConfigError::NotAnObject {
            found: value_kind(&other),
        }),
    }
}

/// Validate a raw default export and build the finalized configuration.
#[instrument(skip_all, fields(cwd = %ctx.cwd.display()))]
pub fn process_config(raw: Value, ctx: &ProcessContext) -> ConfigResult<SuvConfig> {
    let raw = validate_config(raw)?;

    let layered = match ctx.env_prefix.as_deref() {
        Some(prefix) => apply_env_overrides(raw, prefix)?,
        None => raw,
    };

    let validated = object(root_schema()).validate(Some(&Value::Object(layered)), &Keypath::root())?;

    let mut config: SuvConfig =
        serde_json::from_value(Value::Object(validated)).map_err(|err| ConfigError::Extract(err.to_string()))?;
    config.cwd.clone_from(&ctx.cwd);

    check_semantics(&config)?;
    debug!(extra_options = config.extra.len(), "configuration processed");
    Ok(config)
}

/// Layer `<prefix>*` environment variables over the raw object.
///
/// Values are merged as plain strings so the schema coerces them exactly
/// like file values; `SUV_OUT_DIR=2024` stays the directory name `"2024"`.
fn apply_env_overrides(raw: Map<String, Value>, prefix: &str) -> ConfigResult<Map<String, Value>> {
    let env = Env::prefixed(prefix).split("__");

    env.iter()
        .fold(Figment::from(Serialized::defaults(Value::Object(raw))), |figment, (key, value)| {
            debug!(option = %key, "environment override");
            figment.merge(Serialized::defaults(nest(key.as_str(), FigmentValue::from(value))))
        })
        .extract::<Map<String, Value>>()
        .map_err(|err| ConfigError::Overlay(err.to_string()))
}

fn check_semantics(config: &SuvConfig) -> Result<(), ValidationError> {
    let logging = Keypath::root().child("logging");

    if !LOG_LEVELS.contains(&config.logging.level.to_lowercase().as_str()) {
        return Err(ValidationError::invalid_value(
            &logging.child("level"),
            format!("must be one of: {}", LOG_LEVELS.join(", ")),
        ));
    }

    if LogFormat::parse(&config.logging.format).is_none() {
        return Err(ValidationError::invalid_value(
            &logging.child("format"),
            format!("must be one of: {}", LogFormat::NAMES.join(", ")),
        ));
    }

    if RotationPolicy::parse(&config.logging.rotation).is_none() {
        return Err(ValidationError::invalid_value(
            &logging.child("rotation"),
            format!("must be one of: {}", RotationPolicy::NAMES.join(", ")),
        ));
    }

    if config.build.chunk_size_warning_limit <= 0.0 {
        return Err(ValidationError::invalid_value(
            &Keypath::root().child("build").child("chunk_size_warning_limit"),
            "must be positive",
        ));
    }

    Ok(())
}
