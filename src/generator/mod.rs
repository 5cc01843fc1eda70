//! Persona generation collaborators
//!
//! The validation core never talks to a model; everything network-facing
//! lives here. [`Generator`] is the seam: given a loaded schema and the
//! characteristics taxonomy, produce one candidate [`Record`]. Whether that
//! record actually conforms is the caller's question to ask the validator.

pub mod openai;
mod prompt;

use thiserror::Error;

use crate::loader::LoadedSchema;
use crate::models::{CharacteristicsTaxonomy, Record};

pub use openai::OpenAiGenerator;
pub use prompt::render_prompt;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("missing API credentials: set {0}")]
    MissingCredentials(&'static str),

    #[error("request to the generation API failed")]
    Http(#[from] reqwest::Error),

    #[error("generation API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("generation API returned no content")]
    EmptyReply,

    #[error("could not parse generated content as a JSON object: {0}")]
    MalformedReply(String),

    #[error("failed to render the generation prompt")]
    Template(#[from] minijinja::Error),
}

impl GeneratorError {
    /// Whether another attempt with the same request could plausibly
    /// succeed. Bad credentials or a broken endpoint will not heal by
    /// retrying; an unparseable reply might.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GeneratorError::EmptyReply | GeneratorError::MalformedReply(_)
        )
    }
}

/// A persona generation backend.
#[allow(async_fn_in_trait)]
pub trait Generator {
    fn name(&self) -> &'static str;

    /// Cheap probe that the backend is reachable and credentials work.
    async fn verify_access(&self) -> Result<(), GeneratorError>;

    /// Produce one candidate record for the schema. The result is untyped
    /// and unvalidated by design.
    async fn generate(
        &self,
        schema: &LoadedSchema,
        taxonomy: &CharacteristicsTaxonomy,
        context: Option<&str>,
    ) -> Result<Record, GeneratorError>;
}

/// Connection settings for an OpenAI-compatible endpoint, read from the
/// environment the way the CLI's users configure it.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
}

impl GeneratorConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";
    pub const DEFAULT_MODEL: &'static str = "gpt-4";

    pub fn from_env() -> Result<Self, GeneratorError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| GeneratorError::MissingCredentials("OPENAI_API_KEY"))?;

        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let model = std::env::var("PERSONAGEN_MODEL")
            .unwrap_or_else(|_| Self::DEFAULT_MODEL.to_string());

        Ok(Self {
            api_key,
            base_url,
            model,
            temperature: 0.7,
        })
    }
}
