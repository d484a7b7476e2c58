//! API request types.
//!
//! This module provides [`ApiRequest`] and its builder. A request carries a
//! path relative to the API prefix and, optionally, the shop-scope override
//! flag. The flag is consumed by the request interceptor and never sent to
//! the server.

use std::fmt;

use crate::auth::RequestDescriptor;
use crate::clients::errors::InvalidRequestError;

/// HTTP methods used by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET.
    Get,
    /// HTTP POST.
    Post,
    /// HTTP PUT.
    Put,
    /// HTTP DELETE.
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Put => write!(f, "put"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// A request to the backend API.
///
/// # Example
///
/// ```rust
/// use garage_client::{ApiRequest, HttpMethod};
///
/// // A shop-operator call whose path is outside the shop prefix
/// let request = ApiRequest::builder(HttpMethod::Get, "/orders/shop")
///     .query_param("status", "pending")
///     .shop_scoped()
///     .build()
///     .unwrap();
///
/// assert!(request.descriptor().explicit_scope_override);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    /// The HTTP method.
    pub http_method: HttpMethod,
    /// Path relative to the API prefix, starting with `/`.
    pub path: String,
    /// JSON body, if any.
    pub body: Option<serde_json::Value>,
    /// Query parameters in insertion order.
    pub query: Vec<(String, String)>,
    /// Forces the Shop credential scope.
    pub shop_scoped: bool,
}

impl ApiRequest {
    /// Creates a new builder.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> ApiRequestBuilder {
        ApiRequestBuilder::new(method, path)
    }

    /// Returns the descriptor used for scope resolution.
    #[must_use]
    pub fn descriptor(&self) -> RequestDescriptor {
        RequestDescriptor {
            path: self.path.clone(),
            explicit_scope_override: self.shop_scoped,
        }
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError`] if the path is relative, or if a
    /// POST or PUT request has no body.
    pub fn verify(&self) -> Result<(), InvalidRequestError> {
        if !self.path.starts_with('/') {
            return Err(InvalidRequestError::RelativePath {
                path: self.path.clone(),
            });
        }

        if matches!(self.http_method, HttpMethod::Post | HttpMethod::Put) && self.body.is_none() {
            return Err(InvalidRequestError::MissingBody {
                method: self.http_method.to_string(),
            });
        }

        Ok(())
    }
}

/// Builder for [`ApiRequest`].
#[derive(Debug)]
pub struct ApiRequestBuilder {
    http_method: HttpMethod,
    path: String,
    body: Option<serde_json::Value>,
    query: Vec<(String, String)>,
    shop_scoped: bool,
}

impl ApiRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            path: path.into(),
            body: None,
            query: Vec::new(),
            shop_scoped: false,
        }
    }

    /// Sets the JSON body.
    ///
    /// Actions without a payload send an empty object.
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Marks the request as a shop-operator call regardless of its path.
    #[must_use]
    pub const fn shop_scoped(mut self) -> Self {
        self.shop_scoped = true;
        self
    }

    /// Builds the request, validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError`] if the request fails validation.
    pub fn build(self) -> Result<ApiRequest, InvalidRequestError> {
        let request = ApiRequest {
            http_method: self.http_method,
            path: self.path,
            body: self.body,
            query: self.query,
            shop_scoped: self.shop_scoped,
        };
        request.verify()?;
        Ok(request)
    }
}
