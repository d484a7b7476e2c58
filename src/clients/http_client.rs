//! HTTP client for the garage backend.
//!
//! This module provides the [`ApiClient`] type, which runs every request
//! through the request interceptor, sends it, and hands the outcome to the
//! response interceptor before the caller sees it.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::auth::{CredentialStore, ScopeResolver};
use crate::clients::errors::ApiError;
use crate::clients::http_request::{ApiRequest, HttpMethod};
use crate::clients::http_response::TransportFailure;
use crate::clients::interceptor::{PreparedRequest, RequestInterceptor, ResponseInterceptor};
use crate::config::{ClientConfig, RealmPaths};
use crate::navigation::Navigator;
use crate::notify::Notifier;

/// Crate version from Cargo.toml.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for the garage backend.
///
/// The client handles:
/// - URL construction from the base URL and API prefix
/// - Per-request credential scope resolution and bearer injection
/// - Envelope unwrapping
/// - Scoped recovery from `401` responses
///
/// # Thread Safety
///
/// `ApiClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use garage_client::{ApiClient, BaseUrl, ClientConfig, CredentialStore, History, TracingNotifier};
///
/// let config = ClientConfig::builder()
///     .base_url(BaseUrl::new("https://garage.example.com").unwrap())
///     .build()
///     .unwrap();
///
/// let client = ApiClient::new(
///     &config,
///     Arc::new(CredentialStore::in_memory()),
///     Arc::new(History::default()),
///     Arc::new(TracingNotifier),
/// );
///
/// let shops = client.get("/shop/list").await?;
/// ```
#[derive(Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_uri: String,
    user_agent: String,
    store: Arc<CredentialStore>,
    realm_paths: RealmPaths,
    request_interceptor: RequestInterceptor,
    response_interceptor: ResponseInterceptor,
}

// Verify ApiClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiClient>();
};

impl ApiClient {
    /// Creates a new client.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new(
        config: &ClientConfig,
        store: Arc<CredentialStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let base_uri = format!("{}{}", config.base_url(), config.api_prefix());

        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}garage-client v{CLIENT_VERSION}");

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .build()
            .expect("Failed to create HTTP client");

        let realm_paths = config.realm_paths().clone();

        Self {
            client,
            base_uri,
            user_agent,
            request_interceptor: RequestInterceptor::new(
                ScopeResolver::from_realm_paths(&realm_paths),
                Arc::clone(&store),
            ),
            response_interceptor: ResponseInterceptor::new(
                Arc::clone(&store),
                navigator,
                notifier,
                realm_paths.clone(),
            ),
            store,
            realm_paths,
        }
    }

    /// Returns the URI every request path is appended to.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Returns the User-Agent sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the credential store shared with the interceptors.
    #[must_use]
    pub const fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    /// Returns the realm layout.
    #[must_use]
    pub const fn realm_paths(&self) -> &RealmPaths {
        &self.realm_paths
    }

    /// Sends a request and returns the unwrapped envelope `data`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - The envelope code is not `200` (`Application`)
    /// - The server answers `401` (`SessionExpired`)
    /// - Any other transport failure occurs (`Transport`)
    pub async fn request(&self, request: ApiRequest) -> Result<serde_json::Value, ApiError> {
        let prepared = self.request_interceptor.prepare(request)?;

        match self.dispatch(&prepared).await {
            Ok(body) => self.response_interceptor.on_success(&prepared, body),
            Err(failure) => Err(self.response_interceptor.on_failure(&prepared, failure)),
        }
    }

    /// Sends a request and decodes the envelope `data` into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if `data` does not match `T`, or any
    /// error [`request`](Self::request) returns.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, ApiError> {
        let data = self.request(request).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn get(&self, path: &str) -> Result<serde_json::Value, ApiError> {
        self.request(ApiRequest::builder(HttpMethod::Get, path).build()?)
            .await
    }

    /// Sends a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn post(
        &self,
        path: &str,
        body: impl Into<serde_json::Value>,
    ) -> Result<serde_json::Value, ApiError> {
        self.request(ApiRequest::builder(HttpMethod::Post, path).body(body).build()?)
            .await
    }

    /// Sends a PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn put(
        &self,
        path: &str,
        body: impl Into<serde_json::Value>,
    ) -> Result<serde_json::Value, ApiError> {
        self.request(ApiRequest::builder(HttpMethod::Put, path).body(body).build()?)
            .await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn delete(&self, path: &str) -> Result<serde_json::Value, ApiError> {
        self.request(ApiRequest::builder(HttpMethod::Delete, path).build()?)
            .await
    }

    /// Sends a prepared request and returns the parsed body of a 2xx response.
    async fn dispatch(
        &self,
        prepared: &PreparedRequest,
    ) -> Result<serde_json::Value, TransportFailure> {
        let request = &prepared.request;
        let url = format!("{}{}", self.base_uri, request.path);

        let mut builder = match request.http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        builder = builder
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(authorization) = prepared.authorization() {
            builder = builder.header(reqwest::header::AUTHORIZATION, authorization);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportFailure::from_reqwest(&e))?;

        let status = response.status();
        // A failed read of an error body still reports the status.
        let body_text = match response.text().await {
            Ok(text) => text,
            Err(e) if status.is_success() => return Err(TransportFailure::from_reqwest(&e)),
            Err(_) => String::new(),
        };
        let body = if body_text.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&body_text).ok()
        };

        if status.is_success() {
            Ok(body.unwrap_or(serde_json::Value::Null))
        } else {
            Err(TransportFailure::from_status(status.as_u16(), body))
        }
    }
}
