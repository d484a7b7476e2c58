//! # Garage Client
//!
//! Client core for the garage booking platform: credential handling, the
//! API client and the navigation guard.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Two independent credential scopes (customer and shop operator) kept in
//!   a [`CredentialStore`]
//! - Per-request scope resolution via [`ScopeResolver`]
//! - An async [`ApiClient`] that attaches the right bearer token, unwraps the
//!   response envelope and recovers from expired sessions
//! - A pure navigation guard and a [`Router`] that applies it
//! - Login and logout flows via [`auth::session`]
//!
//! ## Quick Start
//!
//! ```rust
//! use garage_client::{BaseUrl, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://garage.example.com").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.api_prefix().as_str(), "/api");
//! ```
//!
//! ## Scope Resolution
//!
//! Requests under the shop prefix, and requests explicitly marked
//! shop-scoped, use the shop token. Everything else uses the customer token.
//!
//! ```rust
//! use garage_client::{CredentialScope, RequestDescriptor, ScopeResolver};
//!
//! let resolver = ScopeResolver::default();
//! assert_eq!(resolver.resolve(&RequestDescriptor::new("/shop/list")), CredentialScope::Shop);
//! assert_eq!(resolver.resolve(&RequestDescriptor::new("/orders/my")), CredentialScope::User);
//! assert_eq!(
//!     resolver.resolve(&RequestDescriptor::shop_scoped("/orders/shop")),
//!     CredentialScope::Shop
//! );
//! ```
//!
//! ## Making Requests
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use garage_client::{ApiClient, CredentialStore, FileStorage, History, TracingNotifier};
//!
//! let store = Arc::new(CredentialStore::new(FileStorage::open("session.json")?));
//! let client = ApiClient::new(&config, store, Arc::new(History::default()), Arc::new(TracingNotifier));
//!
//! // Uses the customer token
//! let orders = client.get("/orders/my").await?;
//!
//! // Uses the shop token
//! let stats = client.get("/shop/dashboard/stats").await?;
//! ```
//!
//! ## Navigation
//!
//! ```rust
//! use std::sync::Arc;
//! use garage_client::navigation::RouteTable;
//! use garage_client::{BaseUrl, ClientConfig, CredentialStore, History, Router};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://garage.example.com").unwrap())
//!     .build()
//!     .unwrap();
//! let router = Router::new(
//!     &config,
//!     RouteTable::standard(),
//!     Arc::new(CredentialStore::in_memory()),
//!     Arc::new(History::default()),
//! );
//!
//! let navigation = router.navigate("/admin").unwrap();
//! assert_eq!(navigation.path, "/login");
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber.
//!
//! ## Design Principles
//!
//! - **No global state**: configuration, store and navigator are passed
//!   explicitly
//! - **Fail-fast validation**: newtypes validate on construction
//! - **Pure decisions**: scope resolution and guard evaluation have no side
//!   effects
//! - **Thread-safe**: all public types are `Send + Sync`

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod navigation;
pub mod notify;

// Re-export public types at crate root for convenience
pub use auth::{
    CredentialScope, CredentialStore, FileStorage, MemoryStorage, RequestDescriptor,
    ScopeResolver, SessionFields, SessionSnapshot, StorageBackend, StorageError, Token,
};
pub use config::{AppPath, BaseUrl, ClientConfig, ClientConfigBuilder, RealmPaths};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{ApiClient, ApiError, ApiRequest, ApiRequestBuilder, HttpMethod};

// Re-export navigation types
pub use navigation::{GuardDecision, History, NavigationGuard, Navigator, Router};
pub use notify::{Notifier, TracingNotifier};
