//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Default conversation backend.
pub const DEFAULT_API_URL: &str = "https://gemini-content-generator-backend.vercel.app";

/// Default currency conversion backend.
pub const DEFAULT_CURRENCY_URL: &str = "http://localhost:3000";

/// Model used when the user does not pick one.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-8b";

/// Environment variable overriding the conversation backend URL.
pub const API_URL_ENV: &str = "CHATBRIDGE_API_URL";
/// Environment variable overriding the currency backend URL.
pub const CURRENCY_URL_ENV: &str = "CHATBRIDGE_CURRENCY_URL";
/// Environment variable overriding the default model.
pub const MODEL_ENV: &str = "CHATBRIDGE_MODEL";

/// A model offered when starting a conversation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelOption {
    /// Identifier sent to the backend.
    pub id: &'static str,
    /// Human-readable label.
    pub label: &'static str,
}

/// Models offered when starting a new conversation.
pub const AVAILABLE_MODELS: &[ModelOption] = &[
    ModelOption {
        id: "gemini-1.5-flash-8b",
        label: "Gemini 1.5 Flash 8B",
    },
    ModelOption {
        id: "gemini-1.5-flash",
        label: "Gemini 1.5 Flash",
    },
    ModelOption {
        id: "gemini-1.5-pro",
        label: "Gemini 1.5 Pro",
    },
];

/// Look up a model option by id.
#[must_use]
pub fn find_model(id: &str) -> Option<&'static ModelOption> {
    AVAILABLE_MODELS.iter().find(|m| m.id == id)
}

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A URL could not be parsed.
    #[error("invalid {field}: {source}")]
    InvalidUrl {
        /// Name of the offending field.
        field: &'static str,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },
    /// Any other out-of-range value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration shared by the conversation and currency clients.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the conversation backend.
    pub api_base_url: String,
    /// Base URL of the currency conversion backend.
    pub currency_base_url: String,
    /// Model used for new conversations when none is picked.
    pub default_model: String,
    /// Request timeout.
    #[serde(with = "duration_serde")]
    pub request_timeout: Duration,
    /// Connection timeout.
    #[serde(with = "duration_serde")]
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            currency_base_url: DEFAULT_CURRENCY_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Create a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `CHATBRIDGE_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.api_base_url = url;
        }
        if let Ok(url) = std::env::var(CURRENCY_URL_ENV) {
            config.currency_base_url = url;
        }
        if let Ok(model) = std::env::var(MODEL_ENV) {
            config.default_model = model;
        }
        config
    }

    /// Set the conversation backend URL.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the currency backend URL.
    #[must_use]
    pub fn with_currency_base_url(mut self, url: impl Into<String>) -> Self {
        self.currency_base_url = url.into();
        self
    }

    /// Set the default model.
    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if a URL does not parse or a value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.api_base_url).map_err(|source| ConfigError::InvalidUrl {
            field: "api_base_url",
            source,
        })?;
        Url::parse(&self.currency_base_url).map_err(|source| ConfigError::InvalidUrl {
            field: "currency_base_url",
            source,
        })?;

        if self.default_model.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_model must not be empty".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "request_timeout must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Serde module for Duration serialization.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
