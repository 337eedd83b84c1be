//! Model configuration.
//!
//! A [`ModelCatalog`] is the list of models a playground session may talk to, each with its
//! API key and optional base URL (local models sit behind an OpenAI-compatible proxy). A
//! persona does not name a single model; it names a group, and [`ModelCatalog::filter`]
//! narrows the catalog to that group to build the persona's [`LlmConfig`].
//!
//! Secrets come from the environment. [`load_env`] reads a `.env`-style file first so that
//! `OPENAI_API_KEY` and friends can live outside the shell profile.
//!
//! # Example
//!
//! ```rust
//! use agentplay::config::{LlmConfig, ModelCatalog, ModelEntry};
//!
//! let catalog = ModelCatalog::new(vec![
//!     ModelEntry::new("gpt-4-turbo-preview").with_api_key("sk-test"),
//!     ModelEntry::new("ollama/codellama").with_base_url("http://localhost:30000"),
//! ]);
//!
//! let config = LlmConfig::new(catalog.filter(&["gpt-4-turbo-preview"])).with_temperature(0.5);
//! assert_eq!(config.config_list.len(), 1);
//! assert_eq!(config.timeout_secs, 300);
//! assert_eq!(catalog.missing_api_keys(), vec!["ollama/codellama"]);
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Environment variable holding the OpenAI key used by the default catalog.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Base URL of the local OpenAI-compatible proxy fronting non-OpenAI models.
pub const LOCAL_PROXY_URL: &str = "http://localhost:30000";

/// Placeholder key the local proxy accepts.
pub const LOCAL_PROXY_KEY: &str = "sk-xxxxx";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_CACHE_SEED: u64 = 42;
pub const DEFAULT_TEMPERATURE: f32 = 0.0;

/// Errors raised while loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The env file exists but could not be read or parsed.
    Env(String),
    /// Catalog JSON could not be (de)serialized.
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Env(msg) => write!(f, "Env file error: {}", msg),
            ConfigError::Json(e) => write!(f, "Catalog JSON error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

/// One model a session can use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Model identifier as the provider (or proxy) expects it.
    pub model: String,
    /// API key, `None` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Endpoint override for OpenAI-compatible proxies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ModelEntry {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: None,
            base_url: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the key from an optional value, treating an empty string as unset.
    pub fn with_optional_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.is_empty());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().map_or(false, |k| !k.is_empty())
    }
}

/// The list of models available to a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelCatalog {
    entries: Vec<ModelEntry>,
}

impl ModelCatalog {
    pub fn new(entries: Vec<ModelEntry>) -> Self {
        Self { entries }
    }

    /// The stock catalog: OpenAI models keyed by `OPENAI_API_KEY`, plus Mistral and
    /// CodeLlama behind the local proxy.
    pub fn from_env() -> Self {
        let openai_key = std::env::var(OPENAI_API_KEY_VAR).ok();
        let openai = |model: &str| ModelEntry::new(model).with_optional_api_key(openai_key.clone());
        let local = |model: &str| {
            ModelEntry::new(model)
                .with_api_key(LOCAL_PROXY_KEY)
                .with_base_url(LOCAL_PROXY_URL)
        };

        Self::new(vec![
            openai("gpt-3.5-turbo-0125"),
            openai("gpt-3.5-turbo"),
            openai("gpt-3.5-turbo-16k-1106"),
            openai("gpt-4-0125-preview"),
            openai("gpt-4-turbo-preview"),
            openai("gpt-4-vision-preview"),
            openai("dall-e-3"),
            local("openai/mistral-medium"),
            local("ollama/codellama"),
            openai("DALLE 2"),
        ])
    }

    pub fn entries(&self) -> &[ModelEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose model is in `models`, in catalog order.
    pub fn filter(&self, models: &[&str]) -> Vec<ModelEntry> {
        self.entries
            .iter()
            .filter(|e| models.contains(&e.model.as_str()))
            .cloned()
            .collect()
    }

    /// Models without an API key.
    pub fn missing_api_keys(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| !e.has_api_key())
            .map(|e| e.model.as_str())
            .collect()
    }

    /// Log a warning for every model without an API key and return how many there were.
    pub fn warn_missing_api_keys(&self) -> usize {
        let missing = self.missing_api_keys();
        for model in &missing {
            warn!(
                "the api key for model {} was not set. Make sure to set it if you need it in your scripts.",
                model
            );
        }
        missing.len()
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Per-persona request parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Seed for response caching; `None` disables the cache.
    pub cache_seed: Option<u64>,
    pub temperature: f32,
    /// Models to try, in order.
    pub config_list: Vec<ModelEntry>,
}

impl LlmConfig {
    pub fn new(config_list: Vec<ModelEntry>) -> Self {
        Self {
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            cache_seed: Some(DEFAULT_CACHE_SEED),
            temperature: DEFAULT_TEMPERATURE,
            config_list,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_cache_seed(mut self, cache_seed: Option<u64>) -> Self {
        self.cache_seed = cache_seed;
        self
    }
}

/// Load variables from an env file into the process environment.
///
/// With `Some(path)`, loads that file; a missing file is logged and yields `Ok(None)`.
/// With `None`, searches for `.env` in the current directory and its parents; if none is
/// found, logs that only the existing environment will be used. Variables already set in
/// the environment are not overridden. Returns the path that was loaded.
pub fn load_env(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    match path {
        Some(path) => {
            if !path.exists() {
                warn!("The specified .env file {} does not exist.", path.display());
                return Ok(None);
            }
            dotenvy::from_path(path).map_err(|e| ConfigError::Env(e.to_string()))?;
            debug!("loaded environment from {}", path.display());
            Ok(Some(path.to_path_buf()))
        }
        None => match dotenvy::dotenv() {
            Ok(found) => {
                debug!("loaded environment from {}", found.display());
                Ok(Some(found))
            }
            Err(e) if e.not_found() => {
                warn!("No .env file found. Loading configurations from environment variables.");
                Ok(None)
            }
            Err(e) => Err(ConfigError::Env(e.to_string())),
        },
    }
}
