//! Structured validation diagnostics
//!
//! A [`Violation`] is a value, not an error: validation failure is an
//! ordinary outcome the caller inspects. Display rendering is the only
//! console-facing piece and lives with the CLI consumers.

use std::fmt;

/// The first problem found while checking a record, located by a dotted
/// field path (array elements as `skills[2]`).
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub path: String,
    pub kind: ViolationKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViolationKind {
    /// A required field is absent from the record.
    MissingField,

    /// The value's runtime shape does not match the declared type.
    WrongType {
        expected: &'static str,
        found: &'static str,
    },

    /// String shorter than the inclusive minimum.
    TooShort { min: usize, len: usize },

    /// String longer than the inclusive maximum.
    TooLong { max: usize, len: usize },

    /// String not a member of the declared closed set.
    NotAnOption { value: String },
}

impl Violation {
    pub fn new(path: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::MissingField => {
                write!(f, "missing required field '{}'", self.path)
            }
            ViolationKind::WrongType { expected, found } => {
                write!(f, "field '{}' should be {expected}, got {found}", self.path)
            }
            ViolationKind::TooShort { min, len } => {
                write!(
                    f,
                    "field '{}' is {len} characters long, below the minimum of {min}",
                    self.path
                )
            }
            ViolationKind::TooLong { max, len } => {
                write!(
                    f,
                    "field '{}' is {len} characters long, above the maximum of {max}",
                    self.path
                )
            }
            ViolationKind::NotAnOption { value } => {
                write!(
                    f,
                    "field '{}' has value '{value}', which is not an allowed option",
                    self.path
                )
            }
        }
    }
}

/// The runtime shape of a JSON value, in schema vocabulary.
pub(crate) fn value_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_field_path() {
        let violation = Violation::new("professional.role", ViolationKind::MissingField);
        assert_eq!(
            violation.to_string(),
            "missing required field 'professional.role'"
        );

        let violation = Violation::new(
            "skills[2]",
            ViolationKind::WrongType {
                expected: "object",
                found: "string",
            },
        );
        assert_eq!(
            violation.to_string(),
            "field 'skills[2]' should be object, got string"
        );
    }

    #[test]
    fn test_value_type_names() {
        assert_eq!(value_type_name(&serde_json::json!("x")), "string");
        assert_eq!(value_type_name(&serde_json::json!(1.5)), "number");
        assert_eq!(value_type_name(&serde_json::json!(null)), "null");
        assert_eq!(value_type_name(&serde_json::json!([])), "array");
        assert_eq!(value_type_name(&serde_json::json!({})), "object");
    }
}
