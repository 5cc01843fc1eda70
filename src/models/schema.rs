use thiserror::Error;

use super::FieldSpec;

/// An ordered, name-unique collection of field specs describing one record
/// shape. Order follows the source document; lookups are by name.
///
/// Built once at load time and immutable thereafter, so it can be shared by
/// reference across any number of concurrent validation calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDefinition {
    fields: Vec<(String, FieldSpec)>,
}

#[derive(Debug, Error, PartialEq)]
#[error("duplicate field name '{0}'")]
pub struct DuplicateField(pub String);

impl SchemaDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, rejecting duplicate names within this level.
    pub fn insert(&mut self, name: impl Into<String>, spec: FieldSpec) -> Result<(), DuplicateField> {
        let name = name.into();
        if self.contains(&name) {
            return Err(DuplicateField(name));
        }
        self.fields.push((name, spec));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|(field_name, _)| field_name == name)
            .map(|(_, spec)| spec)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(field_name, _)| field_name == name)
    }

    /// Fields in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields
            .iter()
            .map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
