//! Schema document parser
//!
//! Turns a raw YAML tree into a [`SchemaDefinition`], enforcing every
//! structural invariant up front so the validator never has to re-interpret
//! the document: one `type` discriminant per field, constraints only where
//! they make sense, recursion into `fields`/`items` blocks, and no duplicate
//! names. Errors carry a slash path into the document so the loader can
//! point at the offending source span.

use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::models::{FieldSpec, FieldType, SchemaDefinition, TYPE_NAMES};

/// A structural problem in a schema document, located by a slash path from
/// the document root (e.g. `/professional/fields/role/type`).
#[derive(Debug, Error, PartialEq)]
#[error("malformed schema at '{path}': {reason}")]
pub struct ParseError {
    pub path: String,
    pub reason: String,
}

impl ParseError {
    fn new(path: &str, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

fn child(path: &str, key: &str) -> String {
    format!("{path}/{key}")
}

/// Parse a whole schema document: a mapping of field name → field entry.
pub fn parse_document(doc: &Value) -> Result<SchemaDefinition, ParseError> {
    let Value::Mapping(map) = doc else {
        return Err(ParseError::new(
            "",
            "schema document must be a mapping of field names",
        ));
    };
    parse_fields(map, "")
}

fn parse_fields(map: &Mapping, path: &str) -> Result<SchemaDefinition, ParseError> {
    let mut schema = SchemaDefinition::new();

    for (key, value) in map {
        let Some(name) = key.as_str() else {
            return Err(ParseError::new(path, "field names must be strings"));
        };
        let field_path = child(path, name);
        let spec = parse_field(value, &field_path)?;
        schema
            .insert(name, spec)
            .map_err(|dup| ParseError::new(&field_path, format!("{dup} at this level")))?;
    }

    Ok(schema)
}

fn parse_field(value: &Value, path: &str) -> Result<FieldSpec, ParseError> {
    let Value::Mapping(entry) = value else {
        return Err(ParseError::new(path, "field entry must be a mapping"));
    };

    let field_type = parse_type(entry, path)?;
    reject_unknown_keys(entry, &field_type, path)?;

    let required = match entry.get("required") {
        None => true,
        Some(Value::Bool(b)) => *b,
        Some(_) => {
            return Err(ParseError::new(
                &child(path, "required"),
                "'required' must be a boolean",
            ));
        }
    };

    let description = match entry.get("description") {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            return Err(ParseError::new(
                &child(path, "description"),
                "'description' must be a string",
            ));
        }
    };

    let characteristic_refs = parse_characteristics(entry, path)?;

    Ok(FieldSpec {
        required,
        field_type,
        description,
        characteristic_refs,
    })
}

fn parse_type(entry: &Mapping, path: &str) -> Result<FieldType, ParseError> {
    let discriminant = match entry.get("type") {
        None => {
            return Err(ParseError::new(path, "missing required key 'type'"));
        }
        Some(Value::String(s)) => s.as_str(),
        Some(_) => {
            return Err(ParseError::new(
                &child(path, "type"),
                "'type' must be a string",
            ));
        }
    };

    match discriminant {
        "string" => parse_string_type(entry, path),
        "number" => Ok(FieldType::Number),
        "boolean" => Ok(FieldType::Boolean),
        "array" => parse_array_type(entry, path),
        "object" => parse_object_type(entry, path),
        other => Err(ParseError::new(
            &child(path, "type"),
            format!(
                "unknown type '{other}' (expected one of {})",
                TYPE_NAMES.join(", ")
            ),
        )),
    }
}

fn parse_string_type(entry: &Mapping, path: &str) -> Result<FieldType, ParseError> {
    let min_length = parse_length(entry, "min_length", path)?;
    let max_length = parse_length(entry, "max_length", path)?;

    if let (Some(min), Some(max)) = (min_length, max_length)
        && min > max
    {
        return Err(ParseError::new(
            &child(path, "min_length"),
            format!("min_length {min} exceeds max_length {max}"),
        ));
    }

    let options = match entry.get("options") {
        None => None,
        Some(Value::Sequence(seq)) => {
            if seq.is_empty() {
                return Err(ParseError::new(
                    &child(path, "options"),
                    "'options' must not be empty",
                ));
            }
            let mut values = Vec::with_capacity(seq.len());
            for item in seq {
                let Some(s) = item.as_str() else {
                    return Err(ParseError::new(
                        &child(path, "options"),
                        "'options' entries must be strings",
                    ));
                };
                values.push(s.to_string());
            }
            Some(values)
        }
        Some(_) => {
            return Err(ParseError::new(
                &child(path, "options"),
                "'options' must be a list of strings",
            ));
        }
    };

    Ok(FieldType::String {
        min_length,
        max_length,
        options,
    })
}

fn parse_length(entry: &Mapping, key: &str, path: &str) -> Result<Option<usize>, ParseError> {
    match entry.get(key) {
        None => Ok(None),
        Some(Value::Number(n)) => match n.as_u64() {
            Some(value) => Ok(Some(value as usize)),
            None => Err(ParseError::new(
                &child(path, key),
                format!("'{key}' must be a non-negative integer"),
            )),
        },
        Some(_) => Err(ParseError::new(
            &child(path, key),
            format!("'{key}' must be a non-negative integer"),
        )),
    }
}

fn parse_array_type(entry: &Mapping, path: &str) -> Result<FieldType, ParseError> {
    let item_spec = match entry.get("items") {
        None => None,
        Some(items) => {
            // An items block is a field entry itself: its own type, and for
            // object items a nested fields block. It is checked for
            // well-formedness either way, but only object-typed items
            // constrain elements; scalar item declarations leave elements
            // unconstrained.
            let spec = parse_field(items, &child(path, "items"))?;
            if matches!(spec.field_type, FieldType::Object { .. }) {
                Some(Box::new(spec))
            } else {
                None
            }
        }
    };

    Ok(FieldType::Array { item_spec })
}

fn parse_object_type(entry: &Mapping, path: &str) -> Result<FieldType, ParseError> {
    let fields = match entry.get("fields") {
        // Absent means the object's internals are not checked.
        None => None,
        Some(Value::Mapping(map)) => Some(parse_fields(map, &child(path, "fields"))?),
        Some(_) => {
            return Err(ParseError::new(
                &child(path, "fields"),
                "'fields' must be a mapping of field names",
            ));
        }
    };

    Ok(FieldType::Object { fields })
}

fn parse_characteristics(entry: &Mapping, path: &str) -> Result<Vec<String>, ParseError> {
    match entry.get("characteristics") {
        None => Ok(Vec::new()),
        Some(Value::Sequence(seq)) => {
            let mut refs = Vec::with_capacity(seq.len());
            for item in seq {
                let Some(s) = item.as_str() else {
                    return Err(ParseError::new(
                        &child(path, "characteristics"),
                        "'characteristics' entries must be strings",
                    ));
                };
                refs.push(s.to_string());
            }
            Ok(refs)
        }
        Some(_) => Err(ParseError::new(
            &child(path, "characteristics"),
            "'characteristics' must be a list of strings",
        )),
    }
}

/// The schema document itself is closed-world: a key that neither the common
/// set nor the field's type understands is a typo worth failing on.
fn reject_unknown_keys(
    entry: &Mapping,
    field_type: &FieldType,
    path: &str,
) -> Result<(), ParseError> {
    const COMMON_KEYS: [&str; 4] = ["type", "required", "description", "characteristics"];

    for key in entry.keys() {
        let Some(key) = key.as_str() else {
            return Err(ParseError::new(path, "field entry keys must be strings"));
        };
        if COMMON_KEYS.contains(&key) {
            continue;
        }

        let allowed = match field_type {
            FieldType::String { .. } => {
                matches!(key, "min_length" | "max_length" | "options")
            }
            FieldType::Array { .. } => key == "items",
            FieldType::Object { .. } => key == "fields",
            FieldType::Number | FieldType::Boolean => false,
        };

        if !allowed {
            return Err(ParseError::new(
                &child(path, key),
                format!(
                    "unknown key '{key}' for {} field",
                    field_type.name()
                ),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Result<SchemaDefinition, ParseError> {
        let doc: Value = serde_yaml::from_str(yaml).unwrap();
        parse_document(&doc)
    }

    #[test]
    fn test_parse_minimal_schema() {
        let schema = parse(
            r#"
name:
  type: string
age:
  type: number
  required: false
"#,
        )
        .unwrap();

        assert_eq!(schema.field_names(), vec!["name", "age"]);
        assert!(schema.get("name").unwrap().required);
        assert!(!schema.get("age").unwrap().required);
    }

    #[test]
    fn test_parse_string_constraints() {
        let schema = parse(
            r#"
bio:
  type: string
  min_length: 10
  max_length: 500
role:
  type: string
  options:
    - engineer
    - designer
"#,
        )
        .unwrap();

        let FieldType::String {
            min_length,
            max_length,
            options,
        } = &schema.get("bio").unwrap().field_type
        else {
            panic!("expected string type for bio");
        };
        assert_eq!(*min_length, Some(10));
        assert_eq!(*max_length, Some(500));
        assert!(options.is_none());

        let FieldType::String { options, .. } = &schema.get("role").unwrap().field_type else {
            panic!("expected string type for role");
        };
        assert_eq!(
            options.as_deref(),
            Some(&["engineer".to_string(), "designer".to_string()][..])
        );
    }

    #[test]
    fn test_parse_nested_object_fields() {
        let schema = parse(
            r#"
professional:
  type: object
  fields:
    role:
      type: string
    years_experience:
      type: number
      required: false
"#,
        )
        .unwrap();

        let FieldType::Object { fields } = &schema.get("professional").unwrap().field_type else {
            panic!("expected object type");
        };
        let nested = fields.as_ref().unwrap();
        assert_eq!(nested.field_names(), vec!["role", "years_experience"]);
    }

    #[test]
    fn test_parse_object_without_fields_is_permissive() {
        let schema = parse("settings:\n  type: object\n").unwrap();

        let FieldType::Object { fields } = &schema.get("settings").unwrap().field_type else {
            panic!("expected object type");
        };
        assert!(fields.is_none());
    }

    #[test]
    fn test_parse_array_of_objects() {
        let schema = parse(
            r#"
skills:
  type: array
  items:
    type: object
    fields:
      name:
        type: string
"#,
        )
        .unwrap();

        let FieldType::Array { item_spec } = &schema.get("skills").unwrap().field_type else {
            panic!("expected array type");
        };
        let item = item_spec.as_ref().unwrap();
        let FieldType::Object { fields } = &item.field_type else {
            panic!("expected object items");
        };
        assert!(fields.as_ref().unwrap().contains("name"));
    }

    #[test]
    fn test_parse_array_without_items_is_unconstrained() {
        let schema = parse("tags:\n  type: array\n").unwrap();

        let FieldType::Array { item_spec } = &schema.get("tags").unwrap().field_type else {
            panic!("expected array type");
        };
        assert!(item_spec.is_none());
    }

    #[test]
    fn test_scalar_items_declaration_is_checked_then_dropped() {
        let schema = parse(
            r#"
scores:
  type: array
  items:
    type: number
"#,
        )
        .unwrap();

        // Well-formed scalar items parse, but they don't constrain elements
        let FieldType::Array { item_spec } = &schema.get("scores").unwrap().field_type else {
            panic!("expected array type");
        };
        assert!(item_spec.is_none());
    }

    #[test]
    fn test_missing_type_is_rejected() {
        let err = parse("name:\n  required: true\n").unwrap_err();
        assert_eq!(err.path, "/name");
        assert!(err.reason.contains("missing required key 'type'"));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = parse("name:\n  type: integer\n").unwrap_err();
        assert_eq!(err.path, "/name/type");
        assert!(err.reason.contains("unknown type 'integer'"));
        assert!(err.reason.contains("string, number, boolean, array, object"));
    }

    #[test]
    fn test_unknown_item_type_is_rejected_at_load_time() {
        let err = parse(
            r#"
tags:
  type: array
  items:
    type: tuple
"#,
        )
        .unwrap_err();
        assert_eq!(err.path, "/tags/items/type");
    }

    #[test]
    fn test_inverted_length_bounds_are_rejected() {
        let err = parse(
            r#"
bio:
  type: string
  min_length: 100
  max_length: 10
"#,
        )
        .unwrap_err();
        assert!(err.reason.contains("min_length 100 exceeds max_length 10"));
    }

    #[test]
    fn test_empty_options_are_rejected() {
        let err = parse("role:\n  type: string\n  options: []\n").unwrap_err();
        assert_eq!(err.path, "/role/options");
    }

    #[test]
    fn test_constraint_on_wrong_type_is_rejected() {
        let err = parse("age:\n  type: number\n  max_length: 3\n").unwrap_err();
        assert_eq!(err.path, "/age/max_length");
        assert!(err.reason.contains("unknown key 'max_length' for number field"));

        let err = parse("name:\n  type: string\n  fields: {}\n").unwrap_err();
        assert!(err.reason.contains("unknown key 'fields' for string field"));
    }

    #[test]
    fn test_deeply_nested_error_path() {
        let err = parse(
            r#"
team:
  type: array
  items:
    type: object
    fields:
      role:
        type: enum
"#,
        )
        .unwrap_err();
        assert_eq!(err.path, "/team/items/fields/role/type");
    }

    #[test]
    fn test_non_mapping_document_is_rejected() {
        let doc: Value = serde_yaml::from_str("- just\n- a\n- list\n").unwrap();
        let err = parse_document(&doc).unwrap_err();
        assert!(err.reason.contains("must be a mapping"));
    }

    #[test]
    fn test_characteristics_are_collected() {
        let schema = parse(
            r#"
job_title:
  type: string
  characteristics:
    - professional.career_path
    - professional.industry
"#,
        )
        .unwrap();

        assert_eq!(
            schema.get("job_title").unwrap().characteristic_refs,
            vec!["professional.career_path", "professional.industry"]
        );
    }
}
