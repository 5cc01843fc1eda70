/// Persona schema model types
///
/// This module defines the data structures a schema document is parsed into:
/// the tagged [`FieldType`] discriminant, per-field [`FieldSpec`]s, and the
/// ordered [`SchemaDefinition`] a validator walks.
mod characteristics;
mod field;
mod schema;

pub use characteristics::{Characteristic, CharacteristicsTaxonomy};
pub use field::{FieldSpec, FieldType, TYPE_NAMES};
pub use schema::{DuplicateField, SchemaDefinition};

/// A candidate persona record: untyped field → value mapping produced by the
/// generation collaborator (or read from disk by the validate command).
pub type Record = serde_json::Map<String, serde_json::Value>;
