use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use personagen::exporter::OutputFormat;

mod commands;

use commands::{GenerateOptions, generate_command, inspect_command, list_command, validate_command};

#[derive(Parser)]
#[command(
    name = "personagen",
    about = "A CLI tool that generates validated synthetic personas from declarative YAML schemas",
    version,
    author,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the directory containing schema files
    #[arg(short, long, default_value = "schemas", global = true)]
    schemas_dir: String,

    /// Enable verbose output (use -vv for debug output)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate personas from a schema (default command)
    Generate {
        /// Schema identifier to generate from
        #[arg(long, default_value = "default_schema")]
        schema: String,

        /// Number of personas to generate
        #[arg(short, long, default_value_t = 1)]
        count: usize,

        /// Output format for exported personas
        #[arg(short, long, value_enum, default_value = "json")]
        format: FormatArg,

        /// Directory for exported files
        #[arg(short, long, default_value = ".")]
        output: String,

        /// Filename prefix for exported files
        #[arg(long, default_value = "persona")]
        prefix: String,

        /// Extra free-text context for the generation prompt
        #[arg(long)]
        context: Option<String>,

        /// Override the model named by PERSONAGEN_MODEL
        #[arg(long)]
        model: Option<String>,

        /// Generation attempts per persona before giving up
        #[arg(long, default_value_t = 3)]
        max_attempts: usize,
    },

    /// Validate schema files, optionally checking a record against one
    Validate {
        /// Validate only this schema (default: all schemas in the directory)
        #[arg(long)]
        schema: Option<String>,

        /// Also check this JSON/YAML record file against the schema
        #[arg(long)]
        record: Option<PathBuf>,
    },

    /// List available schema identifiers
    List,

    /// Inspect the parsed internal model of a schema
    Inspect {
        #[arg(help = "Schema identifier (e.g. 'default_schema')")]
        schema: String,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum FormatArg {
    Json,
    Yaml,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Yaml => OutputFormat::Yaml,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Generate {
            schema,
            count,
            format,
            output,
            prefix,
            context,
            model,
            max_attempts,
        }) => {
            generate_command(
                &cli.schemas_dir,
                GenerateOptions {
                    schema_id: schema,
                    count,
                    format: format.into(),
                    output_dir: output,
                    prefix,
                    context,
                    model,
                    max_attempts,
                },
            )?;
        }
        Some(Commands::Validate { schema, record }) => {
            validate_command(&cli.schemas_dir, schema.as_deref(), record.as_deref())?;
        }
        Some(Commands::List) => {
            list_command(&cli.schemas_dir)?;
        }
        Some(Commands::Inspect { schema }) => {
            inspect_command(&cli.schemas_dir, &schema)?;
        }
        None => {
            // Default to generating a single persona from the default schema
            generate_command(
                &cli.schemas_dir,
                GenerateOptions {
                    schema_id: "default_schema".to_string(),
                    count: 1,
                    format: OutputFormat::Json,
                    output_dir: ".".to_string(),
                    prefix: "persona".to_string(),
                    context: None,
                    model: None,
                    max_attempts: 3,
                },
            )?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbose {
        0 => EnvFilter::new("personagen=warn"), // Default: warnings and errors only
        1 => EnvFilter::new("personagen=info"), // -v: info messages
        _ => EnvFilter::new("personagen=debug"), // -vv or more: full debug
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
