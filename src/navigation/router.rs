//! The router: route resolution, guard evaluation and commit.

use std::sync::Arc;

use thiserror::Error;

use crate::auth::CredentialStore;
use crate::config::ClientConfig;
use crate::navigation::guard::{GuardDecision, NavigationGuard, RouteMeta};
use crate::navigation::routes::RouteTable;
use crate::navigation::{strip_query, Navigator};

/// Errors returned by [`Router::navigate`].
///
/// A guard redirect is not an error; it is reported through
/// [`Navigation::redirected_from`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The navigation target is not an absolute path.
    #[error("Invalid navigation target '{path}': must start with '/'")]
    InvalidTarget {
        /// The rejected target.
        path: String,
    },

    /// Redirects did not settle within the configured bound.
    #[error("Navigation to '{from}' did not settle after {hops} redirects")]
    RedirectLoop {
        /// The originally requested target.
        from: String,
        /// The number of redirects followed.
        hops: usize,
    },
}

/// A committed navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    /// The path finally committed, without query string.
    pub path: String,
    /// The location handed to the [`Navigator`], including any query string.
    pub location: String,
    /// The name of the matched route, if any.
    pub route_name: Option<String>,
    /// The requested target when a redirect replaced it.
    pub redirected_from: Option<String>,
}

impl Navigation {
    /// Returns `true` if the committed path differs from the requested one.
    #[must_use]
    pub const fn was_redirected(&self) -> bool {
        self.redirected_from.is_some()
    }
}

/// Runs every navigation through the route table and the guard before
/// committing it through a [`Navigator`].
///
/// Static route redirects (`/shop` to `/shop/dashboard`) are applied first.
/// A guard redirect starts a fresh evaluation of the new target with a
/// freshly read session.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use garage_client::navigation::RouteTable;
/// use garage_client::{BaseUrl, ClientConfig, CredentialStore, History, Router};
///
/// let config = ClientConfig::builder()
///     .base_url(BaseUrl::new("https://garage.example.com").unwrap())
///     .build()
///     .unwrap();
/// let history = Arc::new(History::default());
/// let router = Router::new(
///     &config,
///     RouteTable::standard(),
///     Arc::new(CredentialStore::in_memory()),
///     history.clone(),
/// );
///
/// let navigation = router.navigate("/member-center").unwrap();
/// assert_eq!(navigation.path, "/login");
/// assert_eq!(navigation.redirected_from.as_deref(), Some("/member-center"));
/// ```
#[derive(Debug)]
pub struct Router {
    table: RouteTable,
    guard: NavigationGuard,
    store: Arc<CredentialStore>,
    navigator: Arc<dyn Navigator>,
    max_redirects: usize,
}

impl Router {
    /// Creates a router.
    #[must_use]
    pub fn new(
        config: &ClientConfig,
        table: RouteTable,
        store: Arc<CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            table,
            guard: NavigationGuard::new(config.realm_paths().clone()),
            store,
            navigator,
            max_redirects: config.max_redirects(),
        }
    }

    /// Returns the route table.
    #[must_use]
    pub const fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Decides one navigation step for `target` without committing it.
    ///
    /// A static route redirect wins over the guard. Unknown paths are
    /// evaluated with public metadata.
    #[must_use]
    pub fn evaluate(&self, target: &str) -> GuardDecision {
        let resolved = self.table.resolve(target);

        if let Some(redirect) = resolved.as_ref().and_then(|route| route.redirect.clone()) {
            return GuardDecision::Redirect(redirect);
        }

        let meta = resolved.as_ref().map_or(RouteMeta::PUBLIC, |route| route.meta);
        let path = resolved
            .as_ref()
            .map_or_else(|| strip_query(target).to_string(), |route| route.path.clone());

        self.guard.decide(&path, &meta, &self.store.snapshot())
    }

    /// Navigates to `target`, following redirects until one is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::InvalidTarget`] if `target` is not absolute,
    /// or [`NavigationError::RedirectLoop`] if more than the configured number
    /// of redirects are issued. Nothing is committed on error.
    pub fn navigate(&self, target: &str) -> Result<Navigation, NavigationError> {
        if !target.starts_with('/') {
            return Err(NavigationError::InvalidTarget {
                path: target.to_string(),
            });
        }

        let mut location = target.to_string();
        let mut hops = 0;

        while let GuardDecision::Redirect(next) = self.evaluate(&location) {
            hops += 1;
            if hops > self.max_redirects {
                tracing::warn!(target_path = target, hops, "navigation redirect loop");
                return Err(NavigationError::RedirectLoop {
                    from: target.to_string(),
                    hops,
                });
            }
            tracing::debug!(from = %location, to = %next, "navigation redirected");
            location = next.as_str().to_string();
        }

        self.navigator.navigate_to(&location);

        let route = self.table.resolve(&location);
        Ok(Navigation {
            path: route
                .as_ref()
                .map_or_else(|| strip_query(&location).to_string(), |r| r.path.clone()),
            route_name: route.and_then(|r| r.name),
            redirected_from: (hops > 0).then(|| target.to_string()),
            location,
        })
    }
}
