//! Optional TOML settings file read once at startup.
//!
//! The file only fills settings left unset by flags and environment.

use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use gemini_search_core::ConfigInputs;
use serde::Deserialize;

pub const SETTINGS_FILE_NAME: &str = "gemini-search-mcp.toml";

#[derive(Debug)]
pub enum SettingsFileError {
    Read { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, message: String },
}

impl fmt::Display for SettingsFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read settings file {}: {source}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "invalid settings file {}: {message}", path.display())
            }
        }
    }
}

impl Error for SettingsFileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { .. } => None,
        }
    }
}

/// A scalar accepted for any setting; values are handed to the resolver as text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum SettingValue {
    Text(String),
    Integer(i64),
    Flag(bool),
}

impl SettingValue {
    fn into_raw(self) -> String {
        match self {
            Self::Text(value) => value,
            Self::Integer(value) => value.to_string(),
            Self::Flag(value) => value.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    api_key: Option<SettingValue>,
    model: Option<SettingValue>,
    timeout_ms: Option<SettingValue>,
    thinking_budget: Option<SettingValue>,
    web_search: Option<SettingValue>,
}

impl From<SettingsFile> for ConfigInputs {
    fn from(file: SettingsFile) -> Self {
        Self {
            api_key: file.api_key.map(SettingValue::into_raw),
            model: file.model.map(SettingValue::into_raw),
            timeout_ms: file.timeout_ms.map(SettingValue::into_raw),
            thinking_budget: file.thinking_budget.map(SettingValue::into_raw),
            web_search: file.web_search.map(SettingValue::into_raw),
        }
    }
}

/// Parses settings file contents.
pub fn parse_settings(path: &Path, contents: &str) -> Result<ConfigInputs, SettingsFileError> {
    let file: SettingsFile = toml::from_str(contents).map_err(|err| SettingsFileError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    Ok(file.into())
}

/// Reads and parses a settings file.
pub fn load_settings(path: &Path) -> Result<ConfigInputs, SettingsFileError> {
    let contents = fs::read_to_string(path).map_err(|source| SettingsFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_settings(path, &contents)
}

/// Default settings file locations for an executable: its own directory, then the parent.
pub fn default_candidates(exe: &Path) -> Vec<PathBuf> {
    exe.parent()
        .into_iter()
        .flat_map(|dir| [Some(dir), dir.parent()])
        .flatten()
        .map(|dir| dir.join(SETTINGS_FILE_NAME))
        .collect()
}

/// First existing file among `candidates`.
pub fn find_existing(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|path| path.is_file()).cloned()
}
