// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the scoped configuration store.
//!
//! Load-time errors always carry the path of the offending scope and the
//! offending name so they can be reported to the operator verbatim. Query-time
//! errors are caller contract violations. A missing key is never an error.

use thiserror::Error;

/// Why a configuration name was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// The name is the empty string.
    #[error("name cannot be empty")]
    Empty,

    /// The name contains a character outside `[A-Za-z0-9_]`.
    #[error("invalid character '{character}' at byte {position}")]
    InvalidCharacter {
        /// The offending character
        character: char,
        /// Byte offset of the character within the name
        position: usize,
    },
}

/// The main error type for store operations.
///
/// This enum is marked as `#[non_exhaustive]` to allow for future additions
/// without breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use scopecfg::domain::errors::ConfigError;
///
/// let error = ConfigError::DuplicateKey {
///     scope: "global/api".to_string(),
///     name: "timeout".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "duplicate config name \"timeout\" in scope 'global/api'"
/// );
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A declared or queried name violates the character-set contract.
    #[error("invalid config name \"{name}\" in scope '{scope}': {source}")]
    InvalidName {
        /// Path of the scope the name was declared in or queried from
        scope: String,
        /// The rejected name, as supplied
        name: String,
        /// What is wrong with it
        #[source]
        source: NameError,
    },

    /// The same name was declared twice within one scope.
    #[error("duplicate config name \"{name}\" in scope '{scope}'")]
    DuplicateKey {
        /// Path of the scope holding both declarations
        scope: String,
        /// The lowercased name
        name: String,
    },

    /// A scope's lookup table could not be compiled.
    #[error("could not build config table for scope '{scope}': {message}")]
    TableBuild {
        /// Path of the scope being compiled
        scope: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A query was made with arguments that violate the call contract.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// The error message
        message: String,
    },

    /// The scope tree was assembled incorrectly.
    #[error("invalid scope: {message}")]
    InvalidScope {
        /// The error message
        message: String,
    },

    /// A table sizing knob was given an unusable value.
    #[error("invalid value {value} for '{setting}' in scope '{scope}'")]
    InvalidSetting {
        /// Path of the scope the knob was set on
        scope: String,
        /// The knob name
        setting: &'static str,
        /// The rejected value
        value: usize,
    },

    /// Failed to parse a declaration document.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An error occurred in a declaration source.
    #[error("Configuration source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading declarations.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates an `InvalidArgument` error from a message.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ConfigError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates an `InvalidScope` error from a message.
    pub fn invalid_scope(message: impl Into<String>) -> Self {
        ConfigError::InvalidScope {
            message: message.into(),
        }
    }
}

/// A specialized Result type for store operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_name_error() {
        let error = ConfigError::InvalidName {
            scope: "global".to_string(),
            name: "bad key!".to_string(),
            source: NameError::InvalidCharacter {
                character: ' ',
                position: 3,
            },
        };
        assert_eq!(
            error.to_string(),
            "invalid config name \"bad key!\" in scope 'global': invalid character ' ' at byte 3"
        );
    }

    #[test]
    fn test_empty_name_error() {
        assert_eq!(NameError::Empty.to_string(), "name cannot be empty");
    }

    #[test]
    fn test_table_build_error() {
        let error = ConfigError::TableBuild {
            scope: "global/api".to_string(),
            message: "increase hash_bucket_size".to_string(),
            source: None,
        };
        assert!(error.to_string().contains("global/api"));
        assert!(error.to_string().contains("hash_bucket_size"));
    }

    #[test]
    fn test_invalid_setting_error() {
        let error = ConfigError::InvalidSetting {
            scope: "global".to_string(),
            setting: "hash_max_size",
            value: 0,
        };
        assert_eq!(
            error.to_string(),
            "invalid value 0 for 'hash_max_size' in scope 'global'"
        );
    }

    #[test]
    fn test_parse_error() {
        let error = ConfigError::ParseError {
            message: "Invalid YAML".to_string(),
            source: None,
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration: Invalid YAML"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = ConfigError::from(io_error);
        assert!(matches!(error, ConfigError::IoError(_)));
    }

    #[test]
    fn test_constructor_helpers() {
        assert!(matches!(
            ConfigError::invalid_argument("x"),
            ConfigError::InvalidArgument { .. }
        ));
        assert_eq!(
            ConfigError::invalid_scope("unknown scope id 9").to_string(),
            "invalid scope: unknown scope id 9"
        );
    }
}
