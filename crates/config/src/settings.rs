//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Ephemeral credential issuer
    #[serde(default)]
    pub credential: CredentialConfig,

    /// Embedding endpoint
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Session timing (readiness wait, polling)
    #[serde(default)]
    pub session: SessionTimingConfig,

    /// Catalog data source
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from an optional file plus environment overrides.
    ///
    /// Environment variables use the `VOICE_SALES_` prefix with `__` as the
    /// section separator, e.g. `VOICE_SALES_CREDENTIAL__API_KEY`.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix("VOICE_SALES").separator("__"))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.credential.issuer_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "credential.issuer_url".to_string(),
                message: "issuer URL must not be empty".to_string(),
            });
        }

        if self.embedding.endpoint.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "embedding.endpoint".to_string(),
                message: "embedding endpoint must not be empty".to_string(),
            });
        }

        if self.embedding.dimension == 0 {
            return Err(ConfigError::InvalidValue {
                field: "embedding.dimension".to_string(),
                message: "embedding dimension must be positive".to_string(),
            });
        }

        if self.session.readiness_timeout_ms < self.session.readiness_poll_ms {
            return Err(ConfigError::InvalidValue {
                field: "session.readiness_timeout_ms".to_string(),
                message: format!(
                    "readiness timeout ({}ms) must not be shorter than the poll interval ({}ms)",
                    self.session.readiness_timeout_ms, self.session.readiness_poll_ms
                ),
            });
        }

        Ok(())
    }
}

/// Ephemeral credential issuer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialConfig {
    /// Issuer endpoint (POST)
    #[serde(default = "default_issuer_url")]
    pub issuer_url: String,

    /// Server-held long-lived key used to authorize issuance.
    /// Never shipped to the browser client.
    #[serde(default)]
    pub api_key: String,

    /// Realtime model requested for the session
    #[serde(default = "default_realtime_model")]
    pub model: String,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            issuer_url: default_issuer_url(),
            api_key: String::new(),
            model: default_realtime_model(),
        }
    }
}

/// Embedding endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding endpoint (POST)
    #[serde(default = "default_embedding_endpoint")]
    pub endpoint: String,

    /// API key for the embedding provider
    #[serde(default)]
    pub api_key: String,

    /// Embedding model identifier
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Fixed vector dimensionality
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: default_embedding_endpoint(),
            api_key: String::new(),
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
        }
    }
}

/// Session timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTimingConfig {
    /// Upper bound on the readiness wait. Past this, the session proceeds
    /// as if ready (fail-open) rather than hanging the caller.
    #[serde(default = "default_readiness_timeout_ms")]
    pub readiness_timeout_ms: u64,

    /// Interval for the channel-state polling fallback
    #[serde(default = "default_readiness_poll_ms")]
    pub readiness_poll_ms: u64,
}

impl Default for SessionTimingConfig {
    fn default() -> Self {
        Self {
            readiness_timeout_ms: default_readiness_timeout_ms(),
            readiness_poll_ms: default_readiness_poll_ms(),
        }
    }
}

/// Catalog data source configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Optional JSON file overriding the embedded catalog
    #[serde(default)]
    pub data_path: Option<String>,
}

fn default_issuer_url() -> String {
    "https://api.openai.com/v1/realtime/client_secrets".to_string()
}

fn default_realtime_model() -> String {
    "gpt-realtime".to_string()
}

fn default_embedding_endpoint() -> String {
    "https://api.openai.com/v1/embeddings".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_embedding_dimension() -> usize {
    1536
}

fn default_readiness_timeout_ms() -> u64 {
    10_000
}

fn default_readiness_poll_ms() -> u64 {
    100
}
