//! Prompt building
//!
//! Renders the generation prompt from the schema's own source text plus
//! per-field guidance pulled from the characteristics taxonomy. Strict
//! undefined behavior so a template drift fails loudly instead of silently
//! dropping context.

use minijinja::{Environment, UndefinedBehavior, context};
use serde::Serialize;

use crate::loader::LoadedSchema;
use crate::models::{CharacteristicsTaxonomy, FieldType, SchemaDefinition};

// Embed the prompt template at compile time
const PROMPT_TEMPLATE: &str = include_str!("prompt.j2");

/// System message framing the generation task.
pub const SYSTEM_PROMPT: &str = "You are a persona generator. Create a realistic persona based on \
     the provided schema. Return the response as a valid JSON object.";

#[derive(Debug, Serialize, PartialEq)]
struct CharacteristicGuidance {
    field: String,
    reference: String,
    description: String,
    examples: Vec<String>,
}

/// Render the user prompt for one generation request.
pub fn render_prompt(
    schema: &LoadedSchema,
    taxonomy: &CharacteristicsTaxonomy,
    extra_context: Option<&str>,
) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.add_template("persona_prompt", PROMPT_TEMPLATE)?;

    let mut guidance = Vec::new();
    collect_guidance(&schema.definition, taxonomy, "", &mut guidance);

    env.get_template("persona_prompt")?.render(context! {
        schema_name => schema.name,
        schema_source => schema.source.trim(),
        guidance => guidance,
        extra_context => extra_context,
    })
}

fn collect_guidance(
    schema: &SchemaDefinition,
    taxonomy: &CharacteristicsTaxonomy,
    prefix: &str,
    out: &mut Vec<CharacteristicGuidance>,
) {
    for (name, spec) in schema.iter() {
        let field = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}.{name}")
        };

        for reference in &spec.characteristic_refs {
            // Refs were cross-checked at load time; a miss here just means
            // the caller skipped verification, so drop it quietly.
            if let Some(characteristic) = taxonomy.lookup(reference) {
                out.push(CharacteristicGuidance {
                    field: field.clone(),
                    reference: reference.clone(),
                    description: characteristic.description.clone(),
                    examples: characteristic.examples.clone(),
                });
            }
        }

        match &spec.field_type {
            FieldType::Object {
                fields: Some(nested),
            } => collect_guidance(nested, taxonomy, &field, out),
            FieldType::Array {
                item_spec: Some(item),
            } => {
                if let FieldType::Object {
                    fields: Some(nested),
                } = &item.field_type
                {
                    collect_guidance(nested, taxonomy, &format!("{field}[]"), out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn loaded_schema(yaml: &str) -> LoadedSchema {
        let doc: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
        LoadedSchema {
            name: "test".to_string(),
            definition: crate::loader::parser::parse_document(&doc).unwrap(),
            source: yaml.to_string(),
            path: PathBuf::from("test.yaml"),
        }
    }

    const SCHEMA_YAML: &str = r#"
job_title:
  type: string
  characteristics:
    - professional.career_path
bio:
  type: string
  max_length: 500
"#;

    #[test]
    fn test_prompt_includes_schema_source() {
        let schema = loaded_schema(SCHEMA_YAML);
        let taxonomy = crate::defaults::default_characteristics().clone();

        let prompt = render_prompt(&schema, &taxonomy, None).unwrap();
        assert!(prompt.contains("'test' schema"));
        assert!(prompt.contains("job_title:"));
        assert!(prompt.contains("max_length: 500"));
    }

    #[test]
    fn test_prompt_expands_characteristic_guidance() {
        let schema = loaded_schema(SCHEMA_YAML);
        let taxonomy = crate::defaults::default_characteristics().clone();

        let prompt = render_prompt(&schema, &taxonomy, None).unwrap();
        assert!(prompt.contains("professional.career_path"));
        // description and at least one example come from the taxonomy
        let career = taxonomy.lookup("professional.career_path").unwrap();
        assert!(prompt.contains(&career.description));
        assert!(prompt.contains(career.examples[0].as_str()));
    }

    #[test]
    fn test_prompt_includes_extra_context_when_given() {
        let schema = loaded_schema(SCHEMA_YAML);
        let taxonomy = crate::defaults::default_characteristics().clone();

        let prompt = render_prompt(&schema, &taxonomy, Some("a 1920s lighthouse keeper")).unwrap();
        assert!(prompt.contains("Additional context: a 1920s lighthouse keeper"));

        let without = render_prompt(&schema, &taxonomy, None).unwrap();
        assert!(!without.contains("Additional context"));
    }

    #[test]
    fn test_guidance_reaches_nested_fields() {
        let schema = loaded_schema(
            r#"
team:
  type: array
  items:
    type: object
    fields:
      role:
        type: string
        characteristics:
          - professional.industry
"#,
        );
        let taxonomy = crate::defaults::default_characteristics().clone();

        let prompt = render_prompt(&schema, &taxonomy, None).unwrap();
        assert!(prompt.contains("team[].role"));
        assert!(prompt.contains("professional.industry"));
    }
}
