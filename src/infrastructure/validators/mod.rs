//! Declarative validators for configuration values
//!
//! Small combinators that each validate and normalize one value shape,
//! composed into nested object shapes with [`object`]:
//!
//! ```
//! use suv_config::infrastructure::validators::{number, object, string, Schema, Validator};
//! use suv_config::domain::models::Keypath;
//! use serde_json::json;
//!
//! let validator = object(
//!     Schema::new()
//!         .field("!name", string(None, true))
//!         .field("port", number(Some(3000.0))),
//! );
//! let validated = validator
//!     .validate(Some(&json!({ "name": "svc" })), &Keypath::root())
//!     .unwrap();
//! assert_eq!(serde_json::Value::Object(validated), json!({ "name": "svc", "port": 3000 }));
//! ```

pub mod combinators;
pub mod object;

use serde_json::{Map, Number, Value};

use crate::domain::models::Keypath;
use crate::domain::ValidationError;

pub use combinators::{
    boolean, integer, number, string, BooleanValidator, IntegerValidator, NumberValidator,
    StringValidator,
};
pub use object::{object, ObjectValidator, Schema, REQUIRED_MARKER};

/// Validates and normalizes one value.
///
/// `raw` is `None` when the field is missing; a JSON `null` is treated the
/// same way. Implementations never modify their input.
pub trait Validator: Send + Sync {
    /// Normalized value produced on success.
    type Output;

    fn validate(&self, raw: Option<&Value>, keypath: &Keypath) -> Result<Self::Output, ValidationError>;
}

/// Type-erased validator stored in a [`Schema`].
pub trait FieldValidator: Send + Sync {
    fn validate_field(&self, raw: Option<&Value>, keypath: &Keypath) -> Result<Value, ValidationError>;
}

impl<V> FieldValidator for V
where
    V: Validator,
    V::Output: IntoConfigValue,
{
    fn validate_field(&self, raw: Option<&Value>, keypath: &Keypath) -> Result<Value, ValidationError> {
        self.validate(raw, keypath).map(IntoConfigValue::into_config_value)
    }
}

/// Conversion of a validator output back into the configuration tree.
///
/// A missing value without a default becomes `null`, the stand-in for an
/// undefined field.
pub trait IntoConfigValue {
    fn into_config_value(self) -> Value;
}

impl IntoConfigValue for Option<String> {
    fn into_config_value(self) -> Value {
        self.map_or(Value::Null, Value::String)
    }
}

impl IntoConfigValue for Option<bool> {
    fn into_config_value(self) -> Value {
        self.map_or(Value::Null, Value::Bool)
    }
}

impl IntoConfigValue for Option<i64> {
    fn into_config_value(self) -> Value {
        self.map_or(Value::Null, Value::from)
    }
}

impl IntoConfigValue for Option<f64> {
    fn into_config_value(self) -> Value {
        self.map_or(Value::Null, number_value)
    }
}

impl IntoConfigValue for Map<String, Value> {
    fn into_config_value(self) -> Value {
        Value::Object(self)
    }
}

/// Numbers carry no int/float distinction in config modules, so integral
/// values are stored as JSON integers.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

/// The value, unless it is missing or `null`.
pub(crate) fn present(raw: Option<&Value>) -> Option<&Value> {
    raw.filter(|value| !value.is_null())
}
