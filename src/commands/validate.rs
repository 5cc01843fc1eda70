use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use personagen::loader::{LoadedSchema, SchemaLoader};
use personagen::models::Record;
use personagen::validation::Validator;

pub fn validate_command(
    schemas_dir: &str,
    schema_id: Option<&str>,
    record_path: Option<&Path>,
) -> Result<()> {
    println!("Validating schemas in: {schemas_dir}");

    let loader = SchemaLoader::new(schemas_dir)?;
    let taxonomy = loader.load_characteristics()?;

    let schema_ids = match schema_id {
        Some(id) => vec![id.to_string()],
        None => loader.list_schemas()?,
    };
    if schema_ids.is_empty() {
        anyhow::bail!("No schema files found in {schemas_dir}");
    }

    let mut last_loaded: Option<LoadedSchema> = None;
    for id in &schema_ids {
        let schema = loader.load(id)?;
        loader.verify_characteristics(&schema, &taxonomy)?;
        println!(
            "  {} schema '{id}' ({} fields)",
            "✓".green(),
            schema.definition.len()
        );
        last_loaded = Some(schema);
    }

    if let Some(record_path) = record_path {
        // A record check needs exactly one schema to check against
        let schema = match (schema_id, &last_loaded) {
            (Some(_), Some(schema)) => schema,
            (None, Some(schema)) if schema_ids.len() == 1 => schema,
            _ => anyhow::bail!("Pass --schema to pick which schema to check the record against"),
        };

        let record = read_record(record_path)?;
        let verdict = Validator::new(&schema.definition).validate(&record);

        match verdict.violation() {
            None => {
                println!(
                    "  {} record {} conforms to schema '{}'",
                    "✓".green(),
                    record_path.display(),
                    schema.name
                );
            }
            Some(violation) => {
                println!(
                    "  {} record {}: {violation}",
                    "✗".red(),
                    record_path.display()
                );
                anyhow::bail!("Record failed validation: {violation}");
            }
        }
    }

    println!("\n✅ All validations passed!");
    Ok(())
}

fn read_record(path: &Path) -> Result<Record> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read record file {}", path.display()))?;

    let value: serde_json::Value = if matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yml" | "yaml")
    ) {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML record {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON record {}", path.display()))?
    };

    match value {
        serde_json::Value::Object(record) => Ok(record),
        _ => anyhow::bail!("Record file {} must contain a mapping", path.display()),
    }
}
