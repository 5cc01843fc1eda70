use anyhow::{Context, Result};
use tracing::warn;

use personagen::exporter::{Exporter, OutputFormat};
use personagen::generator::{Generator, GeneratorConfig, OpenAiGenerator};
use personagen::loader::{LoadedSchema, SchemaLoader};
use personagen::models::{CharacteristicsTaxonomy, Record};
use personagen::validation::Validator;

pub struct GenerateOptions {
    pub schema_id: String,
    pub count: usize,
    pub format: OutputFormat,
    pub output_dir: String,
    pub prefix: String,
    pub context: Option<String>,
    pub model: Option<String>,
    pub max_attempts: usize,
}

pub fn generate_command(schemas_dir: &str, options: GenerateOptions) -> Result<()> {
    let loader = SchemaLoader::new(schemas_dir)?;
    let schema = loader
        .load(&options.schema_id)
        .with_context(|| format!("Failed to load schema '{}'", options.schema_id))?;
    let taxonomy = loader.load_characteristics()?;
    loader.verify_characteristics(&schema, &taxonomy)?;

    let mut config = GeneratorConfig::from_env()?;
    if let Some(model) = &options.model {
        config.model = model.clone();
    }
    let generator = OpenAiGenerator::new(config);
    let exporter = Exporter::new(&options.output_dir);

    // The validation core is synchronous; the runtime exists only for the
    // generator's HTTP calls.
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(run_generation(
        &generator, &schema, &taxonomy, &exporter, &options,
    ))
}

async fn run_generation<G: Generator>(
    generator: &G,
    schema: &LoadedSchema,
    taxonomy: &CharacteristicsTaxonomy,
    exporter: &Exporter,
    options: &GenerateOptions,
) -> Result<()> {
    generator
        .verify_access()
        .await
        .context("Failed to connect to the generation API")?;
    println!("✅ {} connection verified!", generator.name());

    let validator = Validator::new(&schema.definition);

    for index in 1..=options.count {
        println!("\nGenerating persona {index}/{}...", options.count);

        let record = generate_valid_record(generator, &validator, schema, taxonomy, options)
            .await
            .with_context(|| format!("Persona {index} could not be generated"))?;

        let filename = format!("{}_{index}", options.prefix);
        let path = exporter.export(&record, options.format, &filename)?;
        println!("✅ Persona {index} exported to {}", path.display());
    }

    Ok(())
}

/// Generate until a record passes validation, up to max_attempts.
/// Validation failures and unusable replies are retried; credential and
/// endpoint errors abort immediately.
async fn generate_valid_record<G: Generator>(
    generator: &G,
    validator: &Validator<'_>,
    schema: &LoadedSchema,
    taxonomy: &CharacteristicsTaxonomy,
    options: &GenerateOptions,
) -> Result<Record> {
    for attempt in 1..=options.max_attempts {
        match generator
            .generate(schema, taxonomy, options.context.as_deref())
            .await
        {
            Ok(record) => {
                let verdict = validator.validate(&record);
                match verdict.violation() {
                    None => return Ok(record),
                    Some(violation) => {
                        warn!(
                            "Attempt {attempt}/{} failed validation: {violation}",
                            options.max_attempts
                        );
                    }
                }
            }
            Err(error) if error.is_retryable() => {
                warn!(
                    "Attempt {attempt}/{} returned unusable content: {error}",
                    options.max_attempts
                );
            }
            Err(error) => {
                return Err(error).context("Generation request failed");
            }
        }
    }

    anyhow::bail!(
        "No valid persona after {} attempts against schema '{}'",
        options.max_attempts,
        schema.name
    );
}
