//! OpenAI-backed persona generation
//!
//! Talks to any OpenAI-compatible chat-completions endpoint. The reply's
//! content is expected to be a single JSON object, optionally wrapped in a
//! Markdown code fence; anything else is a malformed reply the caller may
//! retry.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::prompt::{SYSTEM_PROMPT, render_prompt};
use super::{Generator, GeneratorConfig, GeneratorError};
use crate::loader::LoadedSchema;
use crate::models::{CharacteristicsTaxonomy, Record};

pub struct OpenAiGenerator {
    client: reqwest::Client,
    config: GeneratorConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

impl OpenAiGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn error_from_response(response: reqwest::Response) -> GeneratorError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        GeneratorError::Api { status, message }
    }
}

impl Generator for OpenAiGenerator {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn verify_access(&self) -> Result<(), GeneratorError> {
        let url = format!("{}/models", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        debug!("✓ Generation API reachable at {}", self.config.base_url);
        Ok(())
    }

    async fn generate(
        &self,
        schema: &LoadedSchema,
        taxonomy: &CharacteristicsTaxonomy,
        context: Option<&str>,
    ) -> Result<Record, GeneratorError> {
        let prompt = render_prompt(schema, taxonomy, context)?;
        debug!("Rendered generation prompt ({} chars)", prompt.len());

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: self.config.temperature,
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let reply: ChatResponse = response.json().await?;
        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GeneratorError::EmptyReply)?;

        parse_record(&content)
    }
}

/// Parse a model reply into a record, tolerating a Markdown code fence
/// around the JSON object.
pub(crate) fn parse_record(content: &str) -> Result<Record, GeneratorError> {
    let body = strip_code_fence(content.trim());

    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| GeneratorError::MalformedReply(e.to_string()))?;

    match value {
        serde_json::Value::Object(record) => Ok(record),
        other => Err(GeneratorError::MalformedReply(format!(
            "expected a JSON object, got {}",
            crate::validation::value_type_name(&other)
        ))),
    }
}

fn strip_code_fence(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("```") else {
        return content;
    };

    // Drop the fence line (which may carry a language tag), then the
    // closing fence.
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}
