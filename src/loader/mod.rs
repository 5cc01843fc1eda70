//! Schema loading
//!
//! Resolves schema identifiers to YAML files, parses them into immutable
//! [`SchemaDefinition`]s, and reports malformed documents with span-labelled
//! diagnostics. Loading happens once per identifier, typically at startup;
//! everything returned from here is read-only afterwards.

pub mod parser;
mod report;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::models::{CharacteristicsTaxonomy, FieldType, SchemaDefinition};
use self::parser::ParseError;
use self::report::SchemaSpanIndex;

const SCHEMA_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// The taxonomy file living alongside schemas; not itself a schema.
const CHARACTERISTICS_STEM: &str = "characteristics";

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schemas directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("schema '{0}' not found in {1}")]
    NotFound(String, PathBuf),

    #[error("schema '{name}' is malformed at '{path}': {reason}")]
    Malformed {
        name: String,
        path: String,
        reason: String,
    },

    #[error("failed to read schema file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A schema together with its source text, which prompt building reuses
/// verbatim.
#[derive(Debug, Clone)]
pub struct LoadedSchema {
    pub name: String,
    pub definition: SchemaDefinition,
    pub source: String,
    pub path: PathBuf,
}

pub struct SchemaLoader {
    schemas_dir: PathBuf,
}

impl SchemaLoader {
    pub fn new(schemas_dir: impl Into<PathBuf>) -> Result<Self, SchemaError> {
        let schemas_dir = schemas_dir.into();
        if !schemas_dir.is_dir() {
            return Err(SchemaError::DirectoryNotFound(schemas_dir));
        }
        Ok(Self { schemas_dir })
    }

    /// Load and parse one schema by identifier.
    ///
    /// Malformed schemas are reported to stderr with a source snippet before
    /// the error is returned; the error is never partially applied.
    pub fn load(&self, schema_id: &str) -> Result<LoadedSchema, SchemaError> {
        let file_path = self.resolve(schema_id).ok_or_else(|| {
            SchemaError::NotFound(schema_id.to_string(), self.schemas_dir.clone())
        })?;

        let source = fs::read_to_string(&file_path).map_err(|source| SchemaError::Io {
            path: file_path.clone(),
            source,
        })?;

        let doc: serde_yaml::Value = serde_yaml::from_str(&source).map_err(|e| {
            SchemaError::Malformed {
                name: schema_id.to_string(),
                path: String::new(),
                reason: format!("invalid YAML: {e}"),
            }
        })?;

        match parser::parse_document(&doc) {
            Ok(definition) => {
                debug!("✓ Schema '{}' loaded from {}", schema_id, file_path.display());
                Ok(LoadedSchema {
                    name: schema_id.to_string(),
                    definition,
                    source,
                    path: file_path,
                })
            }
            Err(parse_error) => {
                self.report_malformed(&file_path, &source, &parse_error);
                Err(SchemaError::Malformed {
                    name: schema_id.to_string(),
                    path: parse_error.path,
                    reason: parse_error.reason,
                })
            }
        }
    }

    /// All schema identifiers available in the schemas directory.
    pub fn list_schemas(&self) -> Result<Vec<String>, SchemaError> {
        let entries = fs::read_dir(&self.schemas_dir).map_err(|source| SchemaError::Io {
            path: self.schemas_dir.clone(),
            source,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| SchemaError::Io {
                path: self.schemas_dir.clone(),
                source,
            })?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            if !matches!(
                path.extension().and_then(|s| s.to_str()),
                Some("yml" | "yaml")
            ) {
                continue;
            }

            if let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && stem != CHARACTERISTICS_STEM
            {
                names.push(stem.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    /// Load the characteristics taxonomy: the `characteristics.yaml` next to
    /// the schemas when present, the embedded default otherwise.
    pub fn load_characteristics(&self) -> Result<CharacteristicsTaxonomy, SchemaError> {
        let Some(file_path) = self.resolve(CHARACTERISTICS_STEM) else {
            debug!("No characteristics file found, using embedded defaults");
            return Ok(crate::defaults::default_characteristics().clone());
        };

        let source = fs::read_to_string(&file_path).map_err(|source| SchemaError::Io {
            path: file_path.clone(),
            source,
        })?;

        CharacteristicsTaxonomy::from_yaml(&source).map_err(|e| SchemaError::Malformed {
            name: CHARACTERISTICS_STEM.to_string(),
            path: String::new(),
            reason: format!("invalid characteristics taxonomy: {e}"),
        })
    }

    /// Cross-check every `category.key` reference in the schema against the
    /// taxonomy. Runs at load time only; record validation never consults
    /// characteristics.
    pub fn verify_characteristics(
        &self,
        schema: &LoadedSchema,
        taxonomy: &CharacteristicsTaxonomy,
    ) -> Result<(), SchemaError> {
        match check_refs(&schema.definition, taxonomy, "") {
            Ok(()) => Ok(()),
            Err(parse_error) => {
                self.report_malformed(&schema.path, &schema.source, &parse_error);
                Err(SchemaError::Malformed {
                    name: schema.name.clone(),
                    path: parse_error.path,
                    reason: parse_error.reason,
                })
            }
        }
    }

    fn resolve(&self, stem: &str) -> Option<PathBuf> {
        SCHEMA_EXTENSIONS
            .iter()
            .map(|ext| self.schemas_dir.join(format!("{stem}.{ext}")))
            .find(|candidate| candidate.is_file())
    }

    fn report_malformed(&self, file_path: &Path, source: &str, error: &ParseError) {
        match SchemaSpanIndex::new(file_path, source) {
            Ok(index) => {
                let file_error = index.error_at(&error.path, error.reason.clone());
                eprintln!();
                eprintln!("{:?}", miette::Report::new(file_error));
            }
            Err(e) => {
                debug!("Could not build span index for {}: {e}", file_path.display());
            }
        }
    }
}

fn check_refs(
    schema: &SchemaDefinition,
    taxonomy: &CharacteristicsTaxonomy,
    path: &str,
) -> Result<(), ParseError> {
    for (name, spec) in schema.iter() {
        let field_path = format!("{path}/{name}");

        for reference in &spec.characteristic_refs {
            if taxonomy.lookup(reference).is_none() {
                return Err(ParseError {
                    path: format!("{field_path}/characteristics"),
                    reason: format!("unknown characteristic reference '{reference}'"),
                });
            }
        }

        match &spec.field_type {
            FieldType::Object {
                fields: Some(nested),
            } => check_refs(nested, taxonomy, &format!("{field_path}/fields"))?,
            FieldType::Array {
                item_spec: Some(item),
            } => {
                let items_path = format!("{field_path}/items");
                for reference in &item.characteristic_refs {
                    if taxonomy.lookup(reference).is_none() {
                        return Err(ParseError {
                            path: format!("{items_path}/characteristics"),
                            reason: format!("unknown characteristic reference '{reference}'"),
                        });
                    }
                }
                if let FieldType::Object {
                    fields: Some(nested),
                } = &item.field_type
                {
                    check_refs(nested, taxonomy, &format!("{items_path}/fields"))?;
                }
            }
            _ => {}
        }
    }

    Ok(())
}
