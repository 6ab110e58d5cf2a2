use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::{Validate, ValidationError};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Settings shared by every translation run.
///
/// A run never mutates its configuration; the factory keeps its own copy.
#[derive(Clone, Debug, Validate, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Suffix appended to the output name of materialized join-key columns
    #[validate(
        length(min = 1, max = 16, message = "Join key suffix must be 1-16 characters"),
        custom(function = "validate_identifier_fragment")
    )]
    pub join_key_suffix: String,

    /// Prefix of generated subquery aliases (`sq0`, `sq1`, ...)
    #[validate(
        length(min = 1, max = 16, message = "Sub-select prefix must be 1-16 characters"),
        custom(function = "validate_identifier_start")
    )]
    pub sub_select_prefix: String,

    /// Map `>=` to `>` the way older translators did.
    pub legacy_greater_than_or_equal: bool,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            join_key_suffix: "_jk".to_string(),
            sub_select_prefix: "sq".to_string(),
            legacy_greater_than_or_equal: false,
        }
    }
}

impl TranslatorConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            join_key_suffix: env::var("RELIR_JOIN_KEY_SUFFIX")
                .unwrap_or(defaults.join_key_suffix),
            sub_select_prefix: env::var("RELIR_SUB_SELECT_PREFIX")
                .unwrap_or(defaults.sub_select_prefix),
            legacy_greater_than_or_equal: parse_env_var("RELIR_LEGACY_GTE", "false")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        Self::from_yaml_str(&content)
    }

    /// Parse and validate configuration from YAML text. Missing keys take defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content.to_string(),
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}

fn validate_identifier_fragment(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(ValidationError::new("identifier_fragment"))
    }
}

fn validate_identifier_start(value: &str) -> Result<(), ValidationError> {
    validate_identifier_fragment(value)?;
    match value.chars().next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => Ok(()),
        _ => Err(ValidationError::new("identifier_start")),
    }
}
