//! Configuration types for the garage client.
//!
//! This module provides the configuration used to construct an
//! [`ApiClient`](crate::ApiClient) and a [`Router`](crate::Router).
//!
//! # Overview
//!
//! - [`ClientConfig`]: Backend location, transport settings and realm layout
//! - [`ClientConfigBuilder`]: A builder for constructing [`ClientConfig`]
//! - [`RealmPaths`]: The well-known paths that define the shop, admin and
//!   customer realms
//! - [`BaseUrl`] and [`AppPath`]: Validated newtypes
//!
//! # Example
//!
//! ```rust
//! use garage_client::{BaseUrl, ClientConfig};
//! use std::time::Duration;
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://garage.example.com").unwrap())
//!     .timeout(Duration::from_secs(5))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.api_prefix().as_str(), "/api");
//! assert_eq!(config.realm_paths().shop_login.as_str(), "/shop/login");
//! ```

mod newtypes;

pub use newtypes::{AppPath, BaseUrl};

use std::time::Duration;

use crate::error::ConfigError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default bound on guard redirects followed for one navigation.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// The paths that define each realm and its entry points.
///
/// `shop_api_prefix` is a raw string prefix checked against request paths
/// (`/shop/list` and `/shop/auth/login` both match) and is never consulted
/// for navigation. The realm paths are segment-aware [`AppPath`]s checked
/// against navigation targets, so the public `/shops` directory is outside
/// the shop realm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RealmPaths {
    /// Request path prefix that selects the Shop credential scope.
    pub shop_api_prefix: String,
    /// Root of the shop-operator realm.
    pub shop_realm: AppPath,
    /// Shop-operator login page.
    pub shop_login: AppPath,
    /// Landing page for an authenticated shop session.
    pub shop_dashboard: AppPath,
    /// Root of the administrator realm.
    pub admin_realm: AppPath,
    /// Customer login page.
    pub user_login: AppPath,
    /// Customer registration page.
    pub user_register: AppPath,
    /// Public home page.
    pub home: AppPath,
    /// Public shop directory; its detail pages live underneath it.
    pub shop_directory: AppPath,
}

impl RealmPaths {
    /// Returns `true` if `path` is inside the shop-operator realm.
    #[must_use]
    pub fn in_shop_realm(&self, path: &str) -> bool {
        self.shop_realm.contains(path)
    }

    /// Returns `true` if `path` is inside the administrator realm.
    #[must_use]
    pub fn in_admin_realm(&self, path: &str) -> bool {
        self.admin_realm.contains(path)
    }

    /// Returns `true` if a shop session may visit `path` outside the shop
    /// realm: customer login, customer registration and the public shop
    /// directory (including its detail pages).
    #[must_use]
    pub fn is_containment_exempt(&self, path: &str) -> bool {
        self.user_login.matches(path)
            || self.user_register.matches(path)
            || self.shop_directory.contains(path)
    }
}

impl Default for RealmPaths {
    fn default() -> Self {
        let path = AppPath::trusted;

        Self {
            shop_api_prefix: "/shop".to_string(),
            shop_realm: path("/shop"),
            shop_login: path("/shop/login"),
            shop_dashboard: path("/shop/dashboard"),
            admin_realm: path("/admin"),
            user_login: path("/login"),
            user_register: path("/register"),
            home: path("/"),
            shop_directory: path("/shops"),
        }
    }
}

/// Configuration for the garage client.
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: BaseUrl,
    api_prefix: AppPath,
    timeout: Duration,
    user_agent_prefix: Option<String>,
    realm_paths: RealmPaths,
    max_redirects: usize,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the backend base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the path prefix every API request is sent under.
    #[must_use]
    pub const fn api_prefix(&self) -> &AppPath {
        &self.api_prefix
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the realm layout.
    #[must_use]
    pub const fn realm_paths(&self) -> &RealmPaths {
        &self.realm_paths
    }

    /// Returns the number of guard redirects followed before a navigation
    /// is abandoned.
    #[must_use]
    pub const fn max_redirects(&self) -> usize {
        self.max_redirects
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// `base_url` is required. Defaults:
///
/// - `api_prefix`: `/api`
/// - `timeout`: 10 seconds
/// - `realm_paths`: [`RealmPaths::default`]
/// - `max_redirects`: 10
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<BaseUrl>,
    api_prefix: Option<AppPath>,
    timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
    realm_paths: Option<RealmPaths>,
    max_redirects: Option<usize>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the backend base URL (required).
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API path prefix.
    #[must_use]
    pub fn api_prefix(mut self, prefix: AppPath) -> Self {
        self.api_prefix = Some(prefix);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Overrides the realm layout.
    #[must_use]
    pub fn realm_paths(mut self, paths: RealmPaths) -> Self {
        self.realm_paths = Some(paths);
        self
    }

    /// Sets the redirect bound for one navigation.
    #[must_use]
    pub const fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = Some(max);
        self
    }

    /// Builds the [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `base_url` is not set.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;

        Ok(ClientConfig {
            base_url,
            api_prefix: self
                .api_prefix
                .unwrap_or_else(|| AppPath::trusted("/api")),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            user_agent_prefix: self.user_agent_prefix,
            realm_paths: self.realm_paths.unwrap_or_default(),
            max_redirects: self.max_redirects.unwrap_or(DEFAULT_MAX_REDIRECTS),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> BaseUrl {
        BaseUrl::new("https://garage.example.com").unwrap()
    }

    #[test]
    fn test_builder_requires_base_url() {
        let result = ClientConfigBuilder::new().build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "base_url" })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = ClientConfig::builder().base_url(base_url()).build().unwrap();

        assert_eq!(config.api_prefix().as_str(), "/api");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.max_redirects(), 10);
        assert!(config.user_agent_prefix().is_none());
        assert_eq!(config.realm_paths(), &RealmPaths::default());
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let mut paths = RealmPaths::default();
        paths.home = AppPath::new("/welcome").unwrap();

        let config = ClientConfig::builder()
            .base_url(base_url())
            .api_prefix(AppPath::new("/backend").unwrap())
            .timeout(Duration::from_secs(3))
            .user_agent_prefix("Kiosk/2.1")
            .realm_paths(paths)
            .max_redirects(4)
            .build()
            .unwrap();

        assert_eq!(config.api_prefix().as_str(), "/backend");
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(config.user_agent_prefix(), Some("Kiosk/2.1"));
        assert_eq!(config.realm_paths().home.as_str(), "/welcome");
        assert_eq!(config.max_redirects(), 4);
    }

    #[test]
    fn test_shop_realm_excludes_public_directory() {
        let paths = RealmPaths::default();
        assert!(paths.in_shop_realm("/shop/orders"));
        assert!(paths.in_shop_realm("/shop/login"));
        assert!(!paths.in_shop_realm("/shops"));
        assert!(!paths.in_shop_realm("/shops/7"));
    }

    #[test]
    fn test_containment_exemptions() {
        let paths = RealmPaths::default();
        assert!(paths.is_containment_exempt("/login"));
        assert!(paths.is_containment_exempt("/register"));
        assert!(paths.is_containment_exempt("/shops"));
        assert!(paths.is_containment_exempt("/shops/42"));
        assert!(!paths.is_containment_exempt("/my-orders"));
        assert!(!paths.is_containment_exempt("/"));
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClientConfig>();
    }
}
