//! Recursive record validation
//!
//! A [`Validator`] borrows an immutable [`SchemaDefinition`] and checks
//! candidate records against it: one recursive descent per call, one schema
//! level per frame. It is a pure function of (record, schema): no I/O, no
//! state, no panics on malformed input. Fail-fast: the walk stops at the
//! first violation, at any depth.
//!
//! Record fields the schema does not describe are permitted and ignored.

use serde_json::Value;

use super::violation::{Violation, ViolationKind, value_type_name};
use crate::models::{FieldSpec, FieldType, Record, SchemaDefinition};

/// The outcome of one validation call: valid, or the first violation found.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    violation: Option<Violation>,
}

impl Verdict {
    fn valid() -> Self {
        Self { violation: None }
    }

    fn invalid(violation: Violation) -> Self {
        Self {
            violation: Some(violation),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.violation.is_none()
    }

    pub fn violation(&self) -> Option<&Violation> {
        self.violation.as_ref()
    }
}

pub struct Validator<'a> {
    schema: &'a SchemaDefinition,
}

impl<'a> Validator<'a> {
    pub fn new(schema: &'a SchemaDefinition) -> Self {
        Self { schema }
    }

    /// Check a candidate record against the schema.
    pub fn validate(&self, record: &Record) -> Verdict {
        match check_fields(self.schema, record, "") {
            Ok(()) => Verdict::valid(),
            Err(violation) => Verdict::invalid(violation),
        }
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn check_fields(
    schema: &SchemaDefinition,
    object: &Record,
    prefix: &str,
) -> Result<(), Violation> {
    for (name, spec) in schema.iter() {
        let path = join_path(prefix, name);
        match object.get(name) {
            None => {
                if spec.required {
                    return Err(Violation::new(path, ViolationKind::MissingField));
                }
            }
            // Present values are checked regardless of the required flag.
            Some(value) => check_value(spec, value, &path)?,
        }
    }

    Ok(())
}

fn check_value(spec: &FieldSpec, value: &Value, path: &str) -> Result<(), Violation> {
    match &spec.field_type {
        FieldType::String {
            min_length,
            max_length,
            options,
        } => {
            let Value::String(text) = value else {
                return Err(wrong_type(path, "string", value));
            };

            let len = text.chars().count();
            if let Some(min) = min_length
                && len < *min
            {
                return Err(Violation::new(
                    path,
                    ViolationKind::TooShort { min: *min, len },
                ));
            }
            if let Some(max) = max_length
                && len > *max
            {
                return Err(Violation::new(
                    path,
                    ViolationKind::TooLong { max: *max, len },
                ));
            }
            if let Some(options) = options
                && !options.iter().any(|option| option == text)
            {
                return Err(Violation::new(
                    path,
                    ViolationKind::NotAnOption {
                        value: text.clone(),
                    },
                ));
            }
        }

        FieldType::Number => {
            if !value.is_number() {
                return Err(wrong_type(path, "number", value));
            }
        }

        FieldType::Boolean => {
            if !value.is_boolean() {
                return Err(wrong_type(path, "boolean", value));
            }
        }

        FieldType::Array { item_spec } => {
            let Value::Array(elements) = value else {
                return Err(wrong_type(path, "array", value));
            };

            if let Some(item_spec) = item_spec {
                for (index, element) in elements.iter().enumerate() {
                    let element_path = format!("{path}[{index}]");
                    check_value(item_spec, element, &element_path)?;
                }
            }
        }

        FieldType::Object { fields } => {
            let Value::Object(nested) = value else {
                return Err(wrong_type(path, "object", value));
            };

            if let Some(fields) = fields {
                check_fields(fields, nested, path)?;
            }
        }
    }

    Ok(())
}

fn wrong_type(path: &str, expected: &'static str, value: &Value) -> Violation {
    Violation::new(
        path,
        ViolationKind::WrongType {
            expected,
            found: value_type_name(value),
        },
    )
}
