//! Error types shared across the workspace.
//!
//! Domain crates keep their own error enums (`FilesError`, `PreviewError`);
//! this type covers configuration, serialization and argument handling that
//! every crate and binary needs.
//!
//! # Examples
//!
//! ```
//! use uigen_core::{Error, Result};
//!
//! fn check_alias(alias: &str) -> Result<()> {
//!     if !alias.ends_with('/') {
//!         return Err(Error::ConfigError {
//!             message: "alias prefix must end with '/'".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = check_alias("@").unwrap_err();
//! assert!(err.is_config_error());
//! ```

use thiserror::Error;

/// Main error type for shared UIGen concerns.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    ///
    /// Raised when configuration is invalid, missing required fields,
    /// or contains contradictory settings.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Serialization/deserialization error.
    ///
    /// Raised when JSON, TOML or template rendering fails.
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Description of the serialization failure
        message: String,
        /// Underlying serde error
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Invalid argument error.
    ///
    /// Raised when CLI arguments or function parameters are invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O failure while reading configuration or project files.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File the operation targeted
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Returns `true` if this is a configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use uigen_core::Error;
    ///
    /// let err = Error::ConfigError {
    ///     message: "bad alias".to_string(),
    /// };
    /// assert!(err.is_config_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns `true` if this is a serialization error.
    #[must_use]
    pub const fn is_serialization_error(&self) -> bool {
        matches!(self, Self::SerializationError { .. })
    }

    /// Returns `true` if this is an invalid argument error.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Returns `true` if this is an I/O error.
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Type alias for Result with the shared error type.
pub type Result<T> = std::result::Result<T, Error>;
