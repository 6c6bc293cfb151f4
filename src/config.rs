//! Configuration loading and management for bookcard.
//!
//! Loads settings from `bookcard.toml` with environment variable overrides for sensitive data.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const CONFIG_FILE: &str = "bookcard.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("missing required API key: set GEMINI_API_KEY or api.gemini_key")]
    MissingApiKey,
    #[error("invalid temperature {0}: expected a value between 0.0 and 2.0")]
    InvalidTemperature(f32),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// LLM request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Model identifier (e.g., "gemini-2.5-flash")
    pub model: String,
    /// Sampling temperature, kept low for repeatable cards
    pub temperature: f32,
    /// Language the card text is written in
    pub language: String,
}

/// API configuration (key normally loaded from environment)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub gemini_key: Option<String>,
    /// Base URL of the Gemini REST API
    pub base_url: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    pub level: String,
    /// Directory for the TUI log file
    pub directory: PathBuf,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from the default location (bookcard.toml in cwd or home).
    ///
    /// A missing file is not an error; defaults plus the environment are used instead.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => {
                let mut config = Config::default();
                config.apply_env();
                config.check()?;
                Ok(config)
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.apply_env();
        config.check()?;
        Ok(config)
    }

    /// Override API keys from environment variables
    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            self.api.gemini_key = Some(key);
        }
    }

    fn check(&self) -> Result<(), ConfigError> {
        let temperature = self.agent.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidTemperature(temperature));
        }
        Ok(())
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from(CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        // Check home directory
        dirs::home_dir()
            .map(|home| home.join(".config").join("bookcard").join(CONFIG_FILE))
            .filter(|path| path.exists())
    }

    /// Get the Gemini API key, rejecting blank values
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api
            .gemini_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.5,
            language: "English".to_string(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            gemini_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        let directory = dirs::data_local_dir()
            .map(|dir| dir.join("bookcard"))
            .unwrap_or_else(|| PathBuf::from("./logs"));
        Self {
            level: "info".to_string(),
            directory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.agent.model, "gemini-2.5-flash");
        assert_eq!(config.agent.temperature, 0.5);
        assert!(config.api.base_url.starts_with("https://"));
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config(
            r#"
[agent]
language = "Arabic"
"#,
        );
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.agent.language, "Arabic");
        assert_eq!(config.agent.model, "gemini-2.5-flash");
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_out_of_range_temperature_is_rejected() {
        let file = write_config(
            r#"
[agent]
temperature = 3.5
"#,
        );
        assert!(matches!(
            Config::load_from(file.path()),
            Err(ConfigError::InvalidTemperature(_))
        ));
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let file = write_config("[agent\nmodel = ");
        assert!(matches!(
            Config::load_from(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_env_key_overrides_file() {
        let file = write_config(
            r#"
[api]
gemini_key = "from-file"
"#,
        );
        std::env::set_var(API_KEY_ENV, "from-env");
        let config = Config::load_from(file.path());
        std::env::remove_var(API_KEY_ENV);

        assert_eq!(config.unwrap().api_key().unwrap(), "from-env");
    }

    #[test]
    fn test_missing_api_key() {
        let mut config = Config::default();
        assert!(matches!(config.api_key(), Err(ConfigError::MissingApiKey)));

        config.api.gemini_key = Some("   ".to_string());
        assert!(matches!(config.api_key(), Err(ConfigError::MissingApiKey)));

        config.api.gemini_key = Some("secret".to_string());
        assert_eq!(config.api_key().unwrap(), "secret");
    }
}
