//! Gemini `generateContent` REST client.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::client::{
    GenerateRequest,
    GenerateResponse,
    GenerativeModel,
    ModelError,
    ThinkingConfig,
    ToolDirective,
};
use crate::config::SearchConfig;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// HTTP client for the Gemini API.
///
/// The configured timeout bounds each whole request, connect through body.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    /// Builds a client against the public Gemini endpoint.
    ///
    /// # Errors
    /// Returns [`ModelError::Transport`] if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, ModelError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ModelError::Transport(err.to_string()))?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        })
    }

    /// Builds a client from resolved configuration.
    ///
    /// # Errors
    /// Returns [`ModelError::Transport`] if the HTTP client cannot be built.
    pub fn from_config(config: &SearchConfig) -> Result<Self, ModelError> {
        Self::new(config.api_key(), config.timeout())
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }

    fn map_send_error(&self, err: &reqwest::Error) -> ModelError {
        if err.is_timeout() {
            let millis = self.timeout.as_millis();
            ModelError::Transport(format!("request timed out after {millis} ms"))
        } else {
            ModelError::Transport(err.to_string())
        }
    }
}

impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ModelError> {
        let url = self.endpoint(&request.model);
        debug!(model = %request.model, "sending generateContent request");

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&RequestBody::from_request(request))
            .send()
            .await
            .map_err(|err| self.map_send_error(&err))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.map_send_error(&err))?;

        if !status.is_success() {
            return Err(ModelError::Api {
                status: status.as_u16(),
                message: api_error_message(status, &body),
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|err| ModelError::Decode(err.to_string()))?;

        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
        {
            warn!(model = %request.model, reason, "prompt blocked by Gemini");
        }

        Ok(parsed)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestBody<'a> {
    contents: [RequestContent<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDirective]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    thinking_config: ThinkingConfig,
}

impl<'a> RequestBody<'a> {
    fn from_request(request: &'a GenerateRequest) -> Self {
        Self {
            contents: [RequestContent {
                role: "user",
                parts: [RequestPart {
                    text: &request.prompt,
                }],
            }],
            tools: request.settings.tools.as_deref(),
            generation_config: request
                .settings
                .thinking_config
                .map(|thinking_config| GenerationConfig { thinking_config }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn api_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(message) = envelope.error.message.filter(|m| !m.trim().is_empty())
    {
        return message;
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed.to_string()
    }
}
