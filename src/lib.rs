//! Suv configuration loading and validation
//!
//! Locates `suv.config.js` in a working directory, evaluates it fresh on
//! every load, and runs its default export through a declarative validator
//! pipeline that fills defaults, coerces values, and reports the first
//! violated constraint by its dotted keypath.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): configuration models, keypaths, errors
//! - **Infrastructure Layer** (`infrastructure`): validators, config loader,
//!   logging bootstrap
//!
//! # Example
//!
//! ```ignore
//! use suv_config::{load_config, LoadOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config(LoadOptions::default()).await?;
//!     println!("building {} into {}", config.root, config.out_dir);
//!     Ok(())
//! }
//! ```

pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::models::{BuildConfig, DevConfig, Keypath, LoggingConfig, SuvConfig};
pub use domain::{ConfigError, ConfigResult, ValidationError};
pub use infrastructure::config::{
    load_config, process_config, root_schema, validate_config, ConfigLoader, LoadOptions,
    ProcessContext, CONFIG_FILE_NAME,
};
pub use infrastructure::logging::{LogConfig, LogFormat, LoggerImpl, RotationPolicy};
pub use infrastructure::validators::{
    boolean, integer, number, object, string, FieldValidator, ObjectValidator, Schema, Validator,
};
