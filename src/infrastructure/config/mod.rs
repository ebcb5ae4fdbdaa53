//! Configuration loading infrastructure
//!
//! - Fresh evaluation of `suv.config.js` on every load
//! - Top-level shape guard and environment overrides (figment)
//! - Root schema validation into a typed [`SuvConfig`](crate::domain::models::SuvConfig)

pub mod loader;
pub mod module;
pub mod processor;

pub use loader::{
    config_path, load_config, ConfigLoader, LoadOptions, LoadedModule, CONFIG_FILE_NAME,
    DEFAULT_ENV_PREFIX,
};
pub use module::ModuleError;
pub use processor::{process_config, root_schema, validate_config, ProcessContext};
