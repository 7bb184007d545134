//! Query handling: one prompt in, one text answer out.
//!
//! [`SearchService::search`] never fails. Remote failures are logged and
//! folded into an `Error: ` prefixed answer so callers always receive text.

use std::sync::Arc;

use tracing::{debug, error};

use crate::citations::format_citations;
use crate::client::{
    GenerateRequest,
    GenerateSettings,
    GenerativeModel,
    ModelError,
    ThinkingConfig,
    ToolDirective,
};
use crate::config::SearchConfig;

pub const ERROR_PREFIX: &str = "Error: ";
pub const NO_RESPONSE_TEXT: &str = "No response text available.";
pub const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// Search handler bound to a resolved configuration and a model backend.
pub struct SearchService<M> {
    config: Arc<SearchConfig>,
    model: M,
}

impl<M: Clone> Clone for SearchService<M> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            model: self.model.clone(),
        }
    }
}

impl<M: GenerativeModel> SearchService<M> {
    #[must_use]
    pub fn new(config: SearchConfig, model: M) -> Self {
        Self::with_config(Arc::new(config), model)
    }

    #[must_use]
    pub const fn with_config(config: Arc<SearchConfig>, model: M) -> Self {
        Self { config, model }
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    #[must_use]
    pub fn build_request(&self, query: &str) -> GenerateRequest {
        GenerateRequest {
            model: self.config.model().to_string(),
            prompt: query.to_string(),
            settings: build_settings(&self.config),
        }
    }

    /// Runs the query and returns the answer with citations appended.
    ///
    /// # Errors
    /// Returns the [`ModelError`] raised by the model backend.
    pub async fn try_search(&self, query: &str) -> Result<String, ModelError> {
        let request = self.build_request(query);
        let response = self.model.generate(&request).await?;

        let text = response
            .text()
            .unwrap_or_else(|| NO_RESPONSE_TEXT.to_string());
        let citations = format_citations(response.grounding_metadata());
        debug!(
            model = %request.model,
            grounded = !citations.is_empty(),
            "search completed"
        );

        Ok(text + &citations)
    }

    /// Runs the query, converting any failure into an error answer.
    pub async fn search(&self, query: &str) -> String {
        match self.try_search(query).await {
            Ok(answer) => answer,
            Err(err) => {
                error!(model = %self.config.model(), error = ?err, "error calling Gemini API");
                error_text(&err)
            }
        }
    }
}

/// Derives the settings bag for a request.
///
/// A negative thinking budget omits the directive entirely; zero is sent and
/// disables thinking. With web search off no tools key is sent at all.
#[must_use]
pub fn build_settings(config: &SearchConfig) -> GenerateSettings {
    let thinking_config = (config.thinking_budget() >= 0).then(|| ThinkingConfig {
        thinking_budget: config.thinking_budget(),
    });
    let tools = config
        .web_search()
        .then(|| vec![ToolDirective::google_search()]);

    GenerateSettings {
        tools,
        thinking_config,
    }
}

/// Renders a failure as the text returned to callers.
#[must_use]
pub fn error_text(err: &impl std::error::Error) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        format!("{ERROR_PREFIX}{UNKNOWN_ERROR}")
    } else {
        format!("{ERROR_PREFIX}{message}")
    }
}
