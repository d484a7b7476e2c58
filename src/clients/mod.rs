//! HTTP client types for the garage backend.
//!
//! # Overview
//!
//! - [`ApiClient`]: The async client every API call goes through
//! - [`ApiRequest`]: A request, optionally marked shop-scoped
//! - [`RequestInterceptor`]: Resolves the credential scope and attaches
//!   its bearer token
//! - [`ResponseInterceptor`]: Unwraps the [`Envelope`] and recovers from
//!   authentication failures
//! - [`ApiError`]: The error taxonomy of a failed call
//!
//! # Request lifecycle
//!
//! 1. The request interceptor resolves the scope and reads its token
//! 2. The request is sent with `Authorization: Bearer <token>` when a token
//!    exists, and without credentials otherwise
//! 3. On a 2xx response the envelope is unwrapped; a code other than `200`
//!    becomes [`ApiError::Application`]
//! 4. On a `401` the scope recorded in step 1 is cleared and the client is
//!    sent to that scope's login page if it is still in that scope's realm
//! 5. Any other failure becomes [`ApiError::Transport`]
//!
//! # Example
//!
//! ```rust,ignore
//! use garage_client::{ApiRequest, HttpMethod};
//!
//! // Shop-operator order list; the path is outside the shop prefix
//! let request = ApiRequest::builder(HttpMethod::Get, "/orders/shop")
//!     .query_param("page", 1)
//!     .shop_scoped()
//!     .build()?;
//!
//! let orders = client.request(request).await?;
//! ```

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod interceptor;

pub use errors::{ApiError, InvalidRequestError};
pub use http_client::{ApiClient, CLIENT_VERSION};
pub use http_request::{ApiRequest, ApiRequestBuilder, HttpMethod};
pub use http_response::{Envelope, TransportFailure, SUCCESS_CODE};
pub use interceptor::{PreparedRequest, RequestInterceptor, ResponseInterceptor};
