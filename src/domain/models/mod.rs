pub mod config;
pub mod keypath;

pub use config::{BuildConfig, DevConfig, LoggingConfig, SuvConfig};
pub use keypath::Keypath;
