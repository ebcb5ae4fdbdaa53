//! Object validator composing named field validators.

use std::fmt;

use serde_json::{Map, Value};
use tracing::debug;

use super::{present, FieldValidator, Validator};
use crate::domain::models::Keypath;
use crate::domain::ValidationError;

/// Field-name prefix marking a field that must be present in the input.
pub const REQUIRED_MARKER: char = '!';

struct SchemaField {
    name: String,
    required: bool,
    validator: Box<dyn FieldValidator>,
}

/// Ordered mapping of field name to validator.
///
/// Fields are validated in declaration order. A name starting with
/// [`REQUIRED_MARKER`] declares a required field; the marker is not part of
/// the field name.
#[derive(Default)]
pub struct Schema {
    fields: Vec<SchemaField>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field. Redeclaring a name replaces the earlier entry.
    #[must_use]
    pub fn field<V>(mut self, name: &str, validator: V) -> Self
    where
        V: FieldValidator + 'static,
    {
        let (name, required) = match name.strip_prefix(REQUIRED_MARKER) {
            Some(stripped) => (stripped, true),
            None => (name, false),
        };

        self.fields.retain(|field| field.name != name);
        self.fields.push(SchemaField {
            name: name.to_string(),
            required,
            validator: Box::new(validator),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Declared field names, markers stripped, in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.fields
            .iter()
            .any(|field| field.name == name && field.required)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.fields
                    .iter()
                    .map(|field| (&field.name, if field.required { "required" } else { "optional" })),
            )
            .finish()
    }
}

/// Validator for an object shape; nests by using another `ObjectValidator`
/// as a field.
#[derive(Debug)]
pub struct ObjectValidator {
    schema: Schema,
}

pub fn object(schema: Schema) -> ObjectValidator {
    ObjectValidator { schema }
}

impl ObjectValidator {
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl Validator for ObjectValidator {
    type Output = Map<String, Value>;

    /// Builds a new object holding every declared field. An absent input is
    /// validated as an empty object; undeclared keys are copied through.
    fn validate(&self, raw: Option<&Value>, keypath: &Keypath) -> Result<Self::Output, ValidationError> {
        let source = match present(raw) {
            None => None,
            Some(Value::Object(map)) => Some(map),
            Some(other) => return Err(ValidationError::type_mismatch(keypath, "an object", other)),
        };

        let mut validated = Map::new();
        for field in &self.schema.fields {
            let field_path = keypath.child(&field.name);
            let value = source.and_then(|map| map.get(&field.name));

            if field.required && present(value).is_none() {
                return Err(ValidationError::MissingRequiredField { keypath: field_path });
            }

            let value = field.validator.validate_field(value, &field_path)?;
            validated.insert(field.name.clone(), value);
        }

        for (name, value) in source.into_iter().flatten() {
            if !validated.contains_key(name) {
                debug!(keypath = %keypath.child(name), "passing through undeclared option");
                validated.insert(name.clone(), value.clone());
            }
        }

        Ok(validated)
    }
}
