//! Infrastructure layer module
//!
//! - Validator combinators for declarative config schemas
//! - Config module loading and processing
//! - Logging infrastructure

pub mod config;
pub mod logging;
pub mod validators;
