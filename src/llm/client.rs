use crate::{Error, Result, config::LlmConfig, relay::classify};
use async_openai::types as openai_types;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

/// Remote language model: a prompt in, generated text out.
///
/// Failures carry a human-readable message. Implementations map provider
/// resource exhaustion to [`Error::QuotaExceeded`] and everything else to
/// [`Error::Llm`].
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Client for any OpenAI-compatible chat completions endpoint.
///
/// Requests and responses use the `async-openai` wire types; the call itself
/// goes through `reqwest` so the provider's status code and raw error body
/// are available for classification. No retries happen here.
pub struct OpenAiClient {
    http: reqwest::Client,
    completions_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(config: &LlmConfig, api_key: String) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(Error::config("llm.base_url must not be empty"));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()?;

        Ok(Self {
            http,
            completions_url: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!("Sending prompt of {} chars to {}", prompt.len(), self.model);

        let message = openai_types::ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| Error::llm(format!("Failed to build user message: {}", e)))?;

        let request = openai_types::CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![openai_types::ChatCompletionRequestMessage::from(message)])
            .build()
            .map_err(|e| Error::llm(format!("Failed to build chat request: {}", e)))?;

        let response = self
            .http
            .post(&self.completions_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(provider_error(status, &body));
        }

        let completion: openai_types::CreateChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| Error::llm(format!("Failed to parse chat completion response: {}", e)))?;

        debug!(
            "Received chat completion response with {} choices",
            completion.choices.len()
        );

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::llm("Model returned no content"))
    }
}

/// Classifies a non-2xx provider response.
///
/// A 429 is always resource exhaustion; other statuses are checked against
/// the raw body, which still carries `RESOURCE_EXHAUSTED` when the provider
/// reports it.
fn provider_error(status: StatusCode, body: &str) -> Error {
    let message = provider_message(body);
    if status == StatusCode::TOO_MANY_REQUESTS || classify::is_resource_exhausted(body) {
        Error::QuotaExceeded(message)
    } else {
        Error::Llm(format!("provider returned {}: {}", status.as_u16(), message))
    }
}

/// Pulls `error.message` out of either an OpenAI-style object body or the
/// array-wrapped body Gemini sends, falling back to the raw text.
fn provider_message(body: &str) -> String {
    let raw = body.trim();
    let Ok(value) = serde_json::from_str::<Value>(raw) else {
        return raw.to_string();
    };

    let error = match &value {
        Value::Array(items) => items.first().and_then(|item| item.get("error")),
        other => other.get("error"),
    };

    error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| raw.to_string())
}
