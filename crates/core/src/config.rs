//! Process configuration via `redis_model.toml`
//!
//! Holds the namespace and environment that prefix every key label, and the
//! URL of the store. The configuration is passed explicitly to the model
//! context; nothing here is global.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Store URL used when none is configured.
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";

/// Environment variables consulted, in order, when no environment is set.
pub const ENVIRONMENT_VARS: [&str; 2] = ["REDIS_MODEL_ENV", "APP_ENV"];

/// Config file name conventionally placed next to the application.
pub const CONFIG_FILE_NAME: &str = "redis_model.toml";

/// Key-label and connection configuration.
///
/// # Example
///
/// ```toml
/// namespace = "my_app"
/// environment = "production"
/// redis_url = "redis://localhost:6379/2"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Application namespace, the first segment of every key label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Explicit environment override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// Store URL. Defaults to [`DEFAULT_REDIS_URL`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redis_url: Option<String>,
}

impl Config {
    /// Config with a namespace and explicit environment.
    pub fn new(namespace: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            environment: Some(environment.into()),
            redis_url: None,
        }
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set the environment override.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Set the store URL.
    pub fn with_redis_url(mut self, url: impl Into<String>) -> Self {
        self.redis_url = Some(url.into());
        self
    }

    /// Resolved environment.
    ///
    /// The explicit override wins; otherwise the first non-empty variable in
    /// [`ENVIRONMENT_VARS`] is used.
    pub fn environment(&self) -> Option<String> {
        if let Some(env) = &self.environment {
            return Some(env.clone());
        }
        ENVIRONMENT_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.is_empty())
    }

    /// Resolved namespace.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Resolved store URL.
    pub fn redis_url(&self) -> &str {
        self.redis_url.as_deref().unwrap_or(DEFAULT_REDIS_URL)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# redis-model configuration
#
# Application namespace, first segment of every key label (optional).
# namespace = "my_app"

# Environment, second segment of every key label (optional).
# Falls back to REDIS_MODEL_ENV, then APP_ENV.
# environment = "development"

# Store URL (default: redis://localhost:6379)
# redis_url = "redis://localhost:6379"
"#
    }
}
