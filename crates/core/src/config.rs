//! Configuration management for Krishi.
//!
//! Handles loading and merging configuration from multiple sources:
//! - Built-in defaults
//! - Config file (`krishi.yaml`)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources win. The watsonx.ai credentials are deliberately optional:
//! when any of them is missing the application still serves offline answers.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Default location of the config file, relative to the working directory.
const DEFAULT_CONFIG_FILE: &str = "krishi.yaml";

/// Default location of the query-history database.
const DEFAULT_HISTORY_FILE: &str = "krishi.db";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Caller identity recorded with every query
    pub user: String,

    /// Optional YAML file with knowledge-base statements.
    /// When unset, the built-in agricultural statements are used.
    pub knowledge_path: Option<PathBuf>,

    /// SQLite file holding the query history
    pub history_path: PathBuf,

    /// Default number of documents to retrieve per query
    pub top_k: usize,

    /// Embedding provider configuration
    pub embedding: EmbeddingConfig,

    /// watsonx.ai generation settings (optional)
    pub watsonx: WatsonxSettings,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Embedding provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Provider identifier ("hash" or "ollama")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Embedding dimensionality
    pub dimensions: usize,

    /// Optional provider endpoint (used by the ollama provider)
    pub endpoint: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "hash".to_string(),
            model: "feature-hash-v1".to_string(),
            dimensions: 384,
            endpoint: None,
        }
    }
}

/// Credentials and settings for the watsonx.ai text-generation service.
///
/// All three fields must be non-empty for the AI augmentation layer to be
/// active; otherwise queries are answered from the knowledge base alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatsonxSettings {
    /// Base URL of the watsonx.ai instance
    #[serde(default)]
    pub url: String,

    /// Bearer API key
    #[serde(default)]
    pub api_key: String,

    /// Project identifier sent with every generation request
    #[serde(default)]
    pub project_id: String,
}

impl WatsonxSettings {
    /// True when every credential needed for generation is present.
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
            && !self.api_key.trim().is_empty()
            && !self.project_id.trim().is_empty()
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    user: Option<String>,
    knowledge_path: Option<PathBuf>,
    history_path: Option<PathBuf>,
    top_k: Option<usize>,
    embedding: Option<EmbeddingConfig>,
    watsonx: Option<WatsonxSettings>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            user: "local".to_string(),
            knowledge_path: None,
            history_path: PathBuf::from(DEFAULT_HISTORY_FILE),
            top_k: 3,
            embedding: EmbeddingConfig::default(),
            watsonx: WatsonxSettings::default(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// Environment variables:
    /// - `KRISHI_CONFIG`: Path to the config file
    /// - `KRISHI_USER`: Caller identity
    /// - `WATSONX_URL`, `WATSONX_API_KEY`, `WATSONX_PROJECT_ID`: generation credentials
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("KRISHI_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override the config file
        if let Ok(user) = std::env::var("KRISHI_USER") {
            config.user = user;
        }

        if let Ok(url) = std::env::var("WATSONX_URL") {
            config.watsonx.url = url;
        }

        if let Ok(api_key) = std::env::var("WATSONX_API_KEY") {
            config.watsonx.api_key = api_key;
        }

        if let Ok(project_id) = std::env::var("WATSONX_PROJECT_ID") {
            config.watsonx.project_id = project_id;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(user) = config_file.user {
            result.user = user;
        }

        if let Some(knowledge_path) = config_file.knowledge_path {
            result.knowledge_path = Some(knowledge_path);
        }

        if let Some(history_path) = config_file.history_path {
            result.history_path = history_path;
        }

        if let Some(top_k) = config_file.top_k {
            result.top_k = top_k;
        }

        if let Some(embedding) = config_file.embedding {
            result.embedding = embedding;
        }

        if let Some(watsonx) = config_file.watsonx {
            result.watsonx = watsonx;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over the config file and environment.
    pub fn with_overrides(
        mut self,
        config_file: Option<PathBuf>,
        user: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(user) = user {
            self.user = user;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> AppResult<()> {
        let known_providers = ["hash", "ollama"];
        if !known_providers.contains(&self.embedding.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding.provider,
                known_providers.join(", ")
            )));
        }

        if self.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "Embedding dimensions must be non-zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.user, "local");
        assert_eq!(config.top_k, 3);
        assert_eq!(config.embedding.provider, "hash");
        assert_eq!(config.embedding.dimensions, 384);
        assert!(!config.watsonx.is_configured());
    }

    #[test]
    fn test_watsonx_configured_requires_all_credentials() {
        let mut settings = WatsonxSettings {
            url: "https://us-south.ml.cloud.ibm.com".to_string(),
            api_key: "key".to_string(),
            project_id: "project".to_string(),
        };
        assert!(settings.is_configured());

        settings.project_id = String::new();
        assert!(!settings.is_configured());

        settings.project_id = "   ".to_string();
        assert!(!settings.is_configured());
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden =
            config.with_overrides(None, Some("ramesh".to_string()), None, true, false);

        assert_eq!(overridden.user, "ramesh");
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.embedding.provider = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_default() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }
}
