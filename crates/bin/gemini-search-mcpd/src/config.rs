use clap::Parser;
use gemini_search_core::config::{
    API_KEY_SETTING,
    MODEL_SETTING,
    THINKING_BUDGET_SETTING,
    TIMEOUT_SETTING,
    WEB_SEARCH_SETTING,
};
use gemini_search_core::{ConfigError, ConfigInputs, SearchConfig};
use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use crate::settings::{self, SettingsFileError};

const CONFIG_PATH_SETTING: &str = "GEMINI_SEARCH_MCP_CONFIG";
const LOG_SETTING: &str = "GEMINI_SEARCH_MCP_LOG";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Parser, Debug)]
#[command(
    name = "gemini-search-mcpd",
    version,
    about = "MCP server exposing Gemini with Google Search grounding."
)]
pub struct CliArgs {
    #[arg(long, env = API_KEY_SETTING, hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, env = MODEL_SETTING)]
    model: Option<String>,

    #[arg(long = "timeout-ms", env = TIMEOUT_SETTING, allow_hyphen_values = true)]
    timeout_ms: Option<String>,

    #[arg(long, env = THINKING_BUDGET_SETTING, allow_hyphen_values = true)]
    thinking_budget: Option<String>,

    #[arg(long, env = WEB_SEARCH_SETTING)]
    web_search: Option<String>,

    #[arg(long = "config", env = CONFIG_PATH_SETTING)]
    config_path: Option<PathBuf>,

    #[arg(long = "log", env = LOG_SETTING, default_value = DEFAULT_LOG_FILTER)]
    log_filter: String,
}

/// Runtime configuration loaded from CLI arguments, environment variables, and
/// the optional settings file.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub search: SearchConfig,
    pub settings_file: Option<PathBuf>,
}

#[derive(Debug)]
pub enum DaemonConfigError {
    SettingsFile(SettingsFileError),
    Search(ConfigError),
}

impl fmt::Display for DaemonConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SettingsFile(err) => write!(f, "{err}"),
            Self::Search(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DaemonConfigError {}

impl From<SettingsFileError> for DaemonConfigError {
    fn from(err: SettingsFileError) -> Self {
        Self::SettingsFile(err)
    }
}

impl From<ConfigError> for DaemonConfigError {
    fn from(err: ConfigError) -> Self {
        Self::Search(err)
    }
}

impl CliArgs {
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    fn inputs(&self) -> ConfigInputs {
        ConfigInputs {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            timeout_ms: self.timeout_ms.clone(),
            thinking_budget: self.thinking_budget.clone(),
            web_search: self.web_search.clone(),
        }
    }

    /// An explicit path must exist; otherwise the default locations are probed.
    fn settings_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_path {
            return Some(path.clone());
        }
        let exe = std::env::current_exe().ok()?;
        settings::find_existing(&settings::default_candidates(&exe))
    }
}

impl TryFrom<CliArgs> for DaemonConfig {
    type Error = DaemonConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let settings_file = args.settings_path();
        let mut inputs = args.inputs();
        if let Some(path) = &settings_file {
            inputs = inputs.with_fallback(settings::load_settings(path)?);
        }

        let search = SearchConfig::resolve(inputs)?;
        Ok(Self {
            search,
            settings_file,
        })
    }
}
