//! Error types for the tabular codec.
//!
//! This module defines the error hierarchy used across the crate:
//!
//! - [`CodecError`] - Decode, encode, merge and sort errors
//! - [`ConfigError`] - Invalid environment configuration
//! - [`CliError`] - Top-level errors of the command line front-end
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! The decoder itself never fails on malformed text: unterminated quotes,
//! ragged rows and missing trailing newlines are normalized, not rejected.

use thiserror::Error;

// =============================================================================
// Codec Errors
// =============================================================================

/// Errors raised by the codec operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    /// Explicit delimiter is not a usable single character.
    #[error("Unsupported delimiter '{0}': expected 'auto' or a single character other than a quote or newline")]
    UnsupportedDelimiter(String),

    /// A record lacks the identifier field. `set` names the input holding
    /// it (`base`, `updates` or `records`).
    #[error("Record {index} of {set} has no '{field}' field")]
    MissingKeyField {
        field: String,
        set: &'static str,
        index: usize,
    },

    /// Sort keys of one column derived to incomparable kinds.
    #[error("Cannot sort by '{field}': record {index} has a {found} key, earlier records have {expected} keys")]
    MixedSortKeys {
        field: String,
        expected: &'static str,
        found: &'static str,
        index: usize,
    },

    /// No record to derive a value from.
    #[error("Record set is empty")]
    EmptyRecordSet,

    /// Identifier is not an integer.
    #[error("Identifier '{0}' is not an integer")]
    NonNumericId(String),

    /// Bytes could not be decoded to text.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// JSON input is not an array of objects.
    #[error("Invalid records JSON: {0}")]
    InvalidJson(String),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Variable holds a value that cannot be interpreted.
    #[error("Invalid value for {var}: '{value}' ({message})")]
    InvalidValue {
        var: &'static str,
        value: String,
        message: String,
    },

    /// Delimiter setting rejected by the codec.
    #[error("Invalid delimiter setting: {0}")]
    Delimiter(#[from] CodecError),
}

// =============================================================================
// CLI Errors (top-level)
// =============================================================================

/// Top-level errors of the `tabcodec` binary.
///
/// Wraps all lower-level errors so command handlers can use `?` throughout.
#[derive(Debug, Error)]
pub enum CliError {
    /// Codec error.
    #[error("{0}")]
    Codec(#[from] CodecError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Bad command line usage not caught by argument parsing.
    #[error("Invalid arguments: {0}")]
    Usage(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // CodecError -> CliError
        let codec_err = CodecError::EmptyRecordSet;
        let cli_err: CliError = codec_err.into();
        assert!(cli_err.to_string().contains("empty"));

        // CodecError -> ConfigError -> CliError
        let config_err: ConfigError = CodecError::UnsupportedDelimiter("::".into()).into();
        let cli_err: CliError = config_err.into();
        assert!(cli_err.to_string().contains("::"));
    }

    #[test]
    fn test_missing_key_format() {
        let err = CodecError::MissingKeyField {
            field: "id".into(),
            set: "updates",
            index: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("Record 3 of updates"));
        assert!(msg.contains("'id'"));
    }

    #[test]
    fn test_mixed_sort_keys_format() {
        let err = CodecError::MixedSortKeys {
            field: "n".into(),
            expected: "numeric",
            found: "text",
            index: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("'n'"));
        assert!(msg.contains("text"));
        assert!(msg.contains("numeric"));
    }
}
