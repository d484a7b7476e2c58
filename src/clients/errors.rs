//! Error types for API calls.
//!
//! Every failed call ends in exactly one [`ApiError`] variant:
//!
//! - [`ApiError::Application`]: the backend answered, but the envelope code
//!   was not `200`
//! - [`ApiError::SessionExpired`]: the backend answered `401`; the scope's
//!   credentials have already been cleared
//! - [`ApiError::Transport`]: timeout, connection failure or any other
//!   non-success HTTP status
//! - [`ApiError::InvalidRequest`]: the request was rejected before sending
//! - [`ApiError::Decode`]: the envelope `data` did not match the requested type
//! - [`ApiError::Storage`]: a session flow could not persist credentials
//!
//! None of these are fatal; callers are expected to match on them.
//!
//! # Example
//!
//! ```rust,ignore
//! use garage_client::ApiError;
//!
//! match client.get("/orders/my").await {
//!     Ok(data) => println!("orders: {data}"),
//!     Err(ApiError::SessionExpired { scope, .. }) => println!("{scope} session expired"),
//!     Err(ApiError::Application { message, .. }) => println!("rejected: {message}"),
//!     Err(e) => println!("failed: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::auth::{CredentialScope, StorageError};
use crate::config::AppPath;

/// Error returned when a request fails validation before it is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidRequestError {
    /// The request path is not absolute.
    #[error("Request path '{path}' must start with '/'.")]
    RelativePath {
        /// The offending path.
        path: String,
    },

    /// A POST or PUT request was built without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },
}

/// Unified error type for API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The envelope carried a code other than `200`.
    #[error("{message}")]
    Application {
        /// The envelope code, if one was present.
        code: Option<i64>,
        /// The envelope message, or a generic fallback.
        message: String,
    },

    /// The backend rejected the scope's credentials with a `401`.
    #[error("Session expired for {scope} scope")]
    SessionExpired {
        /// The scope whose credentials were cleared.
        scope: CredentialScope,
        /// The login page the client was sent to, if any.
        redirected_to: Option<AppPath>,
    },

    /// The request could not be completed.
    #[error("{message}")]
    Transport {
        /// The HTTP status, if a response was received.
        status: Option<u16>,
        /// The best available message.
        message: String,
    },

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidRequestError),

    /// The envelope data could not be decoded into the requested type.
    #[error("Failed to decode response data: {0}")]
    Decode(#[from] serde_json::Error),

    /// Credentials could not be persisted.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Returns the HTTP status associated with this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::SessionExpired { .. } => Some(401),
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns `true` if this error cleared a scope's credentials.
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }
}
