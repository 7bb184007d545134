use std::error::Error;
use std::fmt;
use std::time::Duration;

use crate::aliases::{DEFAULT_MODEL_ALIAS, resolve_model};

pub const API_KEY_SETTING: &str = "GEMINI_SEARCH_MCP_API_KEY";
pub const MODEL_SETTING: &str = "GEMINI_MODEL";
pub const TIMEOUT_SETTING: &str = "GEMINI_API_TIMEOUT";
pub const THINKING_BUDGET_SETTING: &str = "GEMINI_THINKING_BUDGET";
pub const WEB_SEARCH_SETTING: &str = "GEMINI_WEB_SEARCH";

pub const DEFAULT_TIMEOUT_MS: u64 = 120_000;
/// Lets the model pick its own reasoning budget.
pub const THINKING_BUDGET_AUTO: i32 = -1;
pub const DEFAULT_WEB_SEARCH: bool = true;

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "{name} is required"),
        }
    }
}

impl Error for ConfigError {}

/// Raw, unparsed settings gathered from flags, environment, or a settings file.
///
/// Empty or whitespace-only values count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigInputs {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub timeout_ms: Option<String>,
    pub thinking_budget: Option<String>,
    pub web_search: Option<String>,
}

impl ConfigInputs {
    /// Fills every unset value from `fallback`, keeping values already present.
    #[must_use]
    pub fn with_fallback(self, fallback: Self) -> Self {
        Self {
            api_key: present(self.api_key).or_else(|| present(fallback.api_key)),
            model: present(self.model).or_else(|| present(fallback.model)),
            timeout_ms: present(self.timeout_ms).or_else(|| present(fallback.timeout_ms)),
            thinking_budget: present(self.thinking_budget)
                .or_else(|| present(fallback.thinking_budget)),
            web_search: present(self.web_search).or_else(|| present(fallback.web_search)),
        }
    }
}

/// Process-wide search configuration, resolved once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct SearchConfig {
    api_key: String,
    model: String,
    timeout: Duration,
    thinking_budget: i32,
    web_search: bool,
}

impl SearchConfig {
    /// Resolves raw inputs into a configuration.
    ///
    /// Unparseable numbers fall back to their defaults rather than failing.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingSetting`] when no API key is provided.
    pub fn resolve(inputs: ConfigInputs) -> Result<Self, ConfigError> {
        let api_key = present(inputs.api_key).ok_or(ConfigError::MissingSetting(API_KEY_SETTING))?;

        let model = present(inputs.model).map_or_else(
            || resolve_model(DEFAULT_MODEL_ALIAS),
            |model| resolve_model(&model),
        );

        let timeout_ms = inputs
            .timeout_ms
            .as_deref()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        let thinking_budget = inputs
            .thinking_budget
            .as_deref()
            .and_then(|value| value.trim().parse::<i32>().ok())
            .unwrap_or(THINKING_BUDGET_AUTO);

        let web_search = parse_bool(inputs.web_search.as_deref(), DEFAULT_WEB_SEARCH);

        Ok(Self {
            api_key,
            model,
            timeout: Duration::from_millis(timeout_ms),
            thinking_budget,
            web_search,
        })
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Negative values mean "auto"; zero disables thinking.
    #[must_use]
    pub const fn thinking_budget(&self) -> i32 {
        self.thinking_budget
    }

    #[must_use]
    pub const fn web_search(&self) -> bool {
        self.web_search
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("thinking_budget", &self.thinking_budget)
            .field("web_search", &self.web_search)
            .finish()
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value.map(str::trim) {
        Some(value) if value.eq_ignore_ascii_case("true") || value == "1" => true,
        Some(value) if value.eq_ignore_ascii_case("false") || value == "0" => false,
        _ => default,
    }
}
