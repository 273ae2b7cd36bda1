//! Structured error types for configuration resolution.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ConfigSource,
    SchemaShape,
    MissingConfig,
    TypeCoercion,
    ConfigBuild,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigSource => "CONFIG_SOURCE",
            ErrorCode::SchemaShape => "SCHEMA_SHAPE",
            ErrorCode::MissingConfig => "MISSING_CONFIG",
            ErrorCode::TypeCoercion => "TYPE_COERCION",
            ErrorCode::ConfigBuild => "CONFIG_BUILD",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boxed cause carried by source failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned while resolving configuration.
///
/// Every variant is fatal to startup. Nothing is cached when one is returned.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The base document or env file could not be located, read or parsed.
    #[error("configuration source {origin} unavailable: {source}")]
    Source {
        origin: String,
        #[source]
        source: BoxError,
    },

    /// A section expected a mapping but the document holds something else.
    #[error("section at path {path} must be a mapping, got {found}")]
    SchemaShape { path: String, found: &'static str },

    /// Required fields that neither the environment nor the document supplied.
    #[error("missing required environment variables: {}", variables.join(", "))]
    Missing { variables: Vec<String> },

    /// An override value could not be coerced to the declared type.
    #[error("cannot coerce {variable}={raw:?} to {expected} (field {path})")]
    TypeCoercion {
        variable: String,
        path: String,
        raw: String,
        expected: &'static str,
    },

    /// The collected values did not deserialize into the target type.
    #[error("failed to build configuration: {0}")]
    Build(#[source] serde_json::Error),
}

impl ConfigError {
    pub fn source_failure(origin: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self::Source {
            origin: origin.into(),
            source: cause.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ConfigError::Source { .. } => ErrorCode::ConfigSource,
            ConfigError::SchemaShape { .. } => ErrorCode::SchemaShape,
            ConfigError::Missing { .. } => ErrorCode::MissingConfig,
            ConfigError::TypeCoercion { .. } => ErrorCode::TypeCoercion,
            ConfigError::Build(_) => ErrorCode::ConfigBuild,
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
