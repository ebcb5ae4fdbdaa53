//! Scalar validators: string, number, boolean, integer.
//!
//! Each returns its configured default, unchanged, when the value is absent.

use std::ops::RangeInclusive;

use serde_json::Value;

use super::{present, Validator};
use crate::domain::models::Keypath;
use crate::domain::ValidationError;

/// Validator for string options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringValidator {
    default: Option<String>,
    allow_empty: bool,
}

/// Accepts only strings. With `allow_empty == false` the empty string is
/// rejected.
pub fn string(default: Option<&str>, allow_empty: bool) -> StringValidator {
    StringValidator {
        default: default.map(str::to_string),
        allow_empty,
    }
}

impl Validator for StringValidator {
    type Output = Option<String>;

    fn validate(&self, raw: Option<&Value>, keypath: &Keypath) -> Result<Self::Output, ValidationError> {
        match present(raw) {
            None => Ok(self.default.clone()),
            Some(Value::String(s)) if s.is_empty() && !self.allow_empty => {
                Err(ValidationError::invalid_value(keypath, "cannot be empty"))
            }
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(ValidationError::type_mismatch(keypath, "a string", other)),
        }
    }
}

/// Validator for numeric options.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberValidator {
    default: Option<f64>,
}

/// Accepts numbers, and strings that parse completely as a finite number.
pub fn number(default: Option<f64>) -> NumberValidator {
    NumberValidator { default }
}

impl Validator for NumberValidator {
    type Output = Option<f64>;

    fn validate(&self, raw: Option<&Value>, keypath: &Keypath) -> Result<Self::Output, ValidationError> {
        match present(raw) {
            None => Ok(self.default),
            Some(value) => coerce_number(value)
                .map(Some)
                .ok_or_else(|| ValidationError::type_mismatch(keypath, "a number", value)),
        }
    }
}

/// Validator for boolean options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanValidator {
    default: Option<bool>,
}

/// Accepts booleans plus the literals `"true"`, `1`, `"false"` and `0`.
pub fn boolean(default: Option<bool>) -> BooleanValidator {
    BooleanValidator { default }
}

impl Validator for BooleanValidator {
    type Output = Option<bool>;

    fn validate(&self, raw: Option<&Value>, keypath: &Keypath) -> Result<Self::Output, ValidationError> {
        let Some(value) = present(raw) else {
            return Ok(self.default);
        };

        let coerced = match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) if s == "true" => Some(true),
            Value::String(s) if s == "false" => Some(false),
            Value::Number(n) => match n.as_f64() {
                Some(x) if x == 1.0 => Some(true),
                Some(x) if x == 0.0 => Some(false),
                _ => None,
            },
            _ => None,
        };

        coerced
            .map(Some)
            .ok_or_else(|| ValidationError::type_mismatch(keypath, "a boolean", value))
    }
}

/// Validator for whole-number options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerValidator {
    default: Option<i64>,
    range: Option<RangeInclusive<i64>>,
}

/// Type checks like [`number`]; fractional or out-of-range values are
/// rejected as invalid.
pub fn integer(default: Option<i64>) -> IntegerValidator {
    IntegerValidator {
        default,
        range: None,
    }
}

impl IntegerValidator {
    /// Restrict accepted values to `min..=max`. The default is not checked.
    #[must_use]
    pub fn range(mut self, min: i64, max: i64) -> Self {
        self.range = Some(min..=max);
        self
    }

    fn check_range(&self, n: i64, keypath: &Keypath) -> Result<i64, ValidationError> {
        match &self.range {
            Some(range) if !range.contains(&n) => Err(ValidationError::invalid_value(
                keypath,
                format!("must be between {} and {}, got {n}", range.start(), range.end()),
            )),
            _ => Ok(n),
        }
    }
}

impl Validator for IntegerValidator {
    type Output = Option<i64>;

    fn validate(&self, raw: Option<&Value>, keypath: &Keypath) -> Result<Self::Output, ValidationError> {
        let Some(value) = present(raw) else {
            return Ok(self.default);
        };

        let exact = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        if let Some(n) = exact {
            return self.check_range(n, keypath).map(Some);
        }

        let n = coerce_number(value)
            .ok_or_else(|| ValidationError::type_mismatch(keypath, "an integer", value))?;
        let n = to_integer(n).ok_or_else(|| {
            ValidationError::invalid_value(keypath, format!("must be a whole number that fits in 64 bits, got {n}"))
        })?;
        self.check_range(n, keypath).map(Some)
    }
}

/// Numeric reading of a value: numbers as-is, strings parsed after trimming.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn to_integer(n: f64) -> Option<i64> {
    (n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64).then_some(n as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn at(name: &str) -> Keypath {
        Keypath::root().child(name)
    }

    #[test]
    fn test_string_absent_returns_default() {
        let v = string(Some("dist"), false);
        assert_eq!(v.validate(None, &at("out_dir")), Ok(Some("dist".to_string())));
        assert_eq!(v.validate(Some(&Value::Null), &at("out_dir")), Ok(Some("dist".to_string())));
        assert_eq!(string(None, true).validate(None, &at("name")), Ok(None));
    }

    #[test]
    fn test_string_default_is_not_revalidated() {
        let v = string(Some(""), false);
        assert_eq!(v.validate(None, &at("name")), Ok(Some(String::new())));
    }

    #[test]
    fn test_string_rejects_non_strings() {
        let err = string(None, true).validate(Some(&json!(42)), &at("name")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TypeMismatch {
                keypath: at("name"),
                expected: "a string",
                found: "number",
            }
        );
    }

    #[test]
    fn test_string_empty_handling() {
        let empty = json!("");
        assert_eq!(string(None, true).validate(Some(&empty), &at("base")), Ok(Some(String::new())));

        let err = string(None, false).validate(Some(&empty), &at("root")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));
        assert_eq!(err.to_string(), ".root cannot be empty");
    }

    #[test]
    fn test_number_accepts_numbers_and_numeric_strings() {
        let v = number(Some(500.0));
        assert_eq!(v.validate(Some(&json!(12)), &at("n")), Ok(Some(12.0)));
        assert_eq!(v.validate(Some(&json!(2.5)), &at("n")), Ok(Some(2.5)));
        assert_eq!(v.validate(Some(&json!(" 3000 ")), &at("n")), Ok(Some(3000.0)));
        assert_eq!(v.validate(Some(&json!("1e3")), &at("n")), Ok(Some(1000.0)));
        assert_eq!(v.validate(None, &at("n")), Ok(Some(500.0)));
    }

    #[test]
    fn test_number_rejects_unparsable_strings() {
        let v = number(None);
        for bad in [json!("12abc"), json!(""), json!("inf"), json!("NaN"), json!(true), json!({})] {
            let err = v.validate(Some(&bad), &at("limit")).unwrap_err();
            assert!(
                matches!(err, ValidationError::TypeMismatch { expected: "a number", .. }),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_boolean_literals() {
        let v = boolean(Some(false));
        assert_eq!(v.validate(Some(&json!(true)), &at("b")), Ok(Some(true)));
        assert_eq!(v.validate(Some(&json!("true")), &at("b")), Ok(Some(true)));
        assert_eq!(v.validate(Some(&json!(1)), &at("b")), Ok(Some(true)));
        assert_eq!(v.validate(Some(&json!("false")), &at("b")), Ok(Some(false)));
        assert_eq!(v.validate(Some(&json!(0)), &at("b")), Ok(Some(false)));
        assert_eq!(v.validate(None, &at("b")), Ok(Some(false)));
    }

    #[test]
    fn test_boolean_checks_input_not_default() {
        // A boolean default must not make arbitrary input acceptable.
        let v = boolean(Some(true));
        for bad in [json!("yes"), json!(2), json!("TRUE"), json!([])] {
            let err = v.validate(Some(&bad), &at("open")).unwrap_err();
            assert!(matches!(err, ValidationError::TypeMismatch { expected: "a boolean", .. }));
        }
    }

    #[test]
    fn test_integer_accepts_whole_numbers() {
        let v = integer(Some(5173));
        assert_eq!(v.validate(Some(&json!(8080)), &at("port")), Ok(Some(8080)));
        assert_eq!(v.validate(Some(&json!(8080.0)), &at("port")), Ok(Some(8080)));
        assert_eq!(v.validate(Some(&json!("8080")), &at("port")), Ok(Some(8080)));
        assert_eq!(v.validate(Some(&json!("-3")), &at("port")), Ok(Some(-3)));
        assert_eq!(v.validate(None, &at("port")), Ok(Some(5173)));
    }

    #[test]
    fn test_integer_rejects_fractions_as_invalid() {
        let err = integer(None).validate(Some(&json!(1.5)), &at("port")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));

        let err = integer(None).validate(Some(&json!("2.25")), &at("port")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));

        let err = integer(None).validate(Some(&json!(u64::MAX)), &at("port")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));
    }

    #[test]
    fn test_integer_type_mismatch() {
        let err = integer(None).validate(Some(&json!("eighty")), &at("port")).unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { expected: "an integer", .. }));
    }

    #[test]
    fn test_integer_range() {
        let v = integer(Some(5173)).range(0, 65535);
        assert_eq!(v.validate(Some(&json!(65535)), &at("port")), Ok(Some(65535)));

        let err = v.validate(Some(&json!(70000)), &at("port")).unwrap_err();
        assert_eq!(err.to_string(), ".port must be between 0 and 65535, got 70000");
    }

    #[test]
    fn test_input_is_not_modified() {
        let input = json!(" 42 ");
        let before = input.clone();
        let _ = number(None).validate(Some(&input), &at("n"));
        assert_eq!(input, before);
    }
}
