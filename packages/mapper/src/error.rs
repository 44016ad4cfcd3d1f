//! Error types for the mapper.
//!
//! Only problems with the source document itself abort a transform. Missing
//! fields, failed coercions, unknown transform rules and malformed mapping
//! entries are absorbed by the resolver and surface as warnings instead.

use thiserror::Error;

/// Main error type for the mapper library.
#[derive(Debug, Error)]
pub enum MapperError {
    /// Source markup is not well-formed.
    #[error("Source document could not be parsed: {0}")]
    SourceParse(#[from] roxmltree::Error),

    /// Source markup exceeds the accepted input size.
    #[error("Source document is too large: {size} bytes (maximum {max})")]
    SourceTooLarge { size: usize, max: usize },

    /// Source markup nests deeper than the accepted depth.
    #[error("Source document nests deeper than {max} levels")]
    SourceTooDeep { max: usize },

    /// Invalid configuration name.
    #[error("Invalid configuration name: '{0}'. Use letters, digits, '-', '_' or '.'")]
    InvalidConfigName(String),

    /// Configuration not found in the store.
    #[error("Configuration not found: {0}")]
    ConfigNotFound(String),

    /// Configuration file has an extension we cannot read.
    #[error("Unsupported configuration format: {0}. Expected .json, .yaml or .yml")]
    UnsupportedConfigFormat(String),

    /// Configuration file exceeds the accepted size.
    #[error("Configuration file is too large: {size} bytes (maximum {max})")]
    ConfigTooLarge { size: u64, max: u64 },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML (de)serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl MapperError {
    /// Whether this error is the fatal "transform failed" signal caused by
    /// the source document, as opposed to a configuration or IO problem.
    #[must_use]
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            Self::SourceParse(_) | Self::SourceTooLarge { .. } | Self::SourceTooDeep { .. }
        )
    }
}

/// Result type alias for mapper operations.
pub type Result<T> = std::result::Result<T, MapperError>;
