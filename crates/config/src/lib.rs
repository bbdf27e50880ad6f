//! Configuration for the voice sales agent
//!
//! Settings are layered: built-in defaults, an optional TOML file, then
//! `VOICE_SALES_`-prefixed environment variables.

pub mod settings;

pub use settings::{
    CatalogConfig, CredentialConfig, EmbeddingConfig, SessionTimingConfig, Settings,
};

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
