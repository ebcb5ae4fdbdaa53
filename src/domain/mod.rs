//! Domain layer for suv configuration
//!
//! Configuration models, keypaths, and the error taxonomy shared by the
//! validators and the loader.

pub mod errors;
pub mod models;

pub use errors::{value_kind, ConfigError, ConfigResult, ValidationError};
