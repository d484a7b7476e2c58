//! Error types for client configuration.
//!
//! This module contains the errors raised while building a [`ClientConfig`]
//! or constructing one of its validated newtypes.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` so that
//! invalid values are rejected before any request is sent or any route is
//! evaluated.
//!
//! # Example
//!
//! ```rust
//! use garage_client::{AppPath, ConfigError};
//!
//! let result = AppPath::new("login");
//! assert!(matches!(result, Err(ConfigError::InvalidPath { .. })));
//! ```
//!
//! [`ClientConfig`]: crate::ClientConfig

use thiserror::Error;

/// Errors that can occur during client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A credential token cannot be empty.
    #[error("Token cannot be empty. A login response must carry a non-empty token.")]
    EmptyToken,

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide a URL with an http or https scheme (e.g., 'https://garage.example.com').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// An application path is invalid.
    #[error("Invalid path '{path}'. Paths must be absolute and start with '/'.")]
    InvalidPath {
        /// The invalid path that was provided.
        path: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
