//! Client-side navigation: route metadata, the navigation guard and the
//! router that applies it.
//!
//! # Overview
//!
//! - [`NavigationGuard`]: Pure decision table over a target path, its
//!   [`RouteMeta`] and a [`SessionSnapshot`](crate::SessionSnapshot)
//! - [`RouteTable`]: Nested route definitions with inherited metadata
//! - [`Router`]: Resolves a target, runs the guard, follows redirects and
//!   commits through a [`Navigator`]
//! - [`Navigator`]: The side-effect capability that actually moves the
//!   client; [`History`] is an in-memory implementation
//!
//! Decisions are computed without side effects, so the guard can be tested
//! on its own; only [`Router::navigate`] and the response interceptor call
//! into a [`Navigator`].

mod guard;
mod routes;
mod router;

pub use guard::{GuardDecision, NavigationGuard, RouteMeta};
pub use routes::{ResolvedRoute, RouteNode, RouteTable};
pub use router::{Navigation, NavigationError, Router};

use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Moves the client to a new location.
pub trait Navigator: Send + Sync + fmt::Debug {
    /// Returns the path of the current location.
    fn current_path(&self) -> String;

    /// Moves to `path`.
    fn navigate_to(&self, path: &str);
}

/// An in-memory [`Navigator`] that records every location visited.
///
/// # Example
///
/// ```rust
/// use garage_client::{History, Navigator};
///
/// let history = History::new("/");
/// history.navigate_to("/shops?page=2");
/// assert_eq!(history.current_path(), "/shops");
/// assert_eq!(history.entries(), vec!["/".to_string(), "/shops?page=2".to_string()]);
/// ```
#[derive(Debug)]
pub struct History {
    entries: Mutex<Vec<String>>,
}

impl History {
    /// Creates a history starting at `initial`.
    #[must_use]
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: Mutex::new(vec![initial.into()]),
        }
    }

    /// Returns every location visited, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the current location including any query string.
    #[must_use]
    pub fn current_location(&self) -> String {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
            .unwrap_or_else(|| "/".to_string())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for History {
    fn current_path(&self) -> String {
        strip_query(&self.current_location()).to_string()
    }

    fn navigate_to(&self, path: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
    }
}

/// Returns the path portion of a location, without query or fragment.
pub(crate) fn strip_query(location: &str) -> &str {
    location
        .split(['?', '#'])
        .next()
        .unwrap_or(location)
}
