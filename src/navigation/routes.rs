//! Route definitions and path matching.
//!
//! A [`RouteTable`] is built from nested [`RouteNode`]s. Child paths are
//! relative to their parent, an empty child path matches the parent path
//! itself, and segments starting with `:` capture a parameter. Access flags
//! are inherited from the parent unless the child sets them.

use std::collections::BTreeMap;

use crate::config::AppPath;
use crate::navigation::guard::RouteMeta;
use crate::navigation::strip_query;

/// One node of the route tree.
///
/// # Example
///
/// ```rust
/// use garage_client::navigation::{RouteNode, RouteTable};
///
/// let table = RouteTable::new(vec![
///     RouteNode::new("/shop")
///         .requires_auth(true)
///         .requires_shop(true)
///         .child(RouteNode::new("").redirect("/shop/dashboard"))
///         .child(RouteNode::new("orders/:id").name("ShopOrderDetail")),
/// ]);
///
/// let route = table.resolve("/shop/orders/42?tab=items").unwrap();
/// assert_eq!(route.name.as_deref(), Some("ShopOrderDetail"));
/// assert_eq!(route.params["id"], "42");
/// assert!(route.meta.requires_shop);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RouteNode {
    path: String,
    name: Option<String>,
    requires_auth: Option<bool>,
    requires_admin: Option<bool>,
    requires_shop: Option<bool>,
    redirect: Option<String>,
    children: Vec<RouteNode>,
}

impl RouteNode {
    /// Creates a node for `path`, absolute at the top level and relative
    /// below it.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Sets the route name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the `requires_auth` flag for this node and its children.
    #[must_use]
    pub const fn requires_auth(mut self, value: bool) -> Self {
        self.requires_auth = Some(value);
        self
    }

    /// Sets the `requires_admin` flag for this node and its children.
    #[must_use]
    pub const fn requires_admin(mut self, value: bool) -> Self {
        self.requires_admin = Some(value);
        self
    }

    /// Sets the `requires_shop` flag for this node and its children.
    #[must_use]
    pub const fn requires_shop(mut self, value: bool) -> Self {
        self.requires_shop = Some(value);
        self
    }

    /// Makes this node a static redirect to `target`.
    ///
    /// A target that is not an absolute path leaves the node out of the
    /// table when it is built.
    #[must_use]
    pub fn redirect(mut self, target: impl Into<String>) -> Self {
        self.redirect = Some(target.into());
        self
    }

    /// Appends a child node.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }
}

/// A navigation target matched against the route table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRoute {
    /// The matched path, without query string, fragment or trailing slash.
    pub path: String,
    /// The route name, if the matched node has one.
    pub name: Option<String>,
    /// Access flags after inheritance.
    pub meta: RouteMeta,
    /// Captured `:param` segments.
    pub params: BTreeMap<String, String>,
    /// Static redirect target of the matched node.
    pub redirect: Option<AppPath>,
}

#[derive(Clone, Debug)]
enum Segment {
    Static(String),
    Param(String),
}

#[derive(Clone, Debug)]
struct Route {
    segments: Vec<Segment>,
    name: Option<String>,
    meta: RouteMeta,
    redirect: Option<AppPath>,
}

impl Route {
    fn capture(&self, parts: &[&str]) -> Option<BTreeMap<String, String>> {
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Static(expected) if expected == part => {}
                Segment::Static(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), (*part).to_string());
                }
            }
        }
        Some(params)
    }
}

/// The application's route tree, flattened for matching.
///
/// Routes are tried in definition order with children ahead of their
/// parent, so an empty child path shadows the parent.
#[derive(Clone, Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Builds a table from top-level nodes.
    #[must_use]
    pub fn new(nodes: Vec<RouteNode>) -> Self {
        let mut routes = Vec::new();
        for node in &nodes {
            flatten(node, "", RouteMeta::default(), &mut routes);
        }
        Self { routes }
    }

    /// Returns the number of matchable routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if the table has no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Matches `location` against the table.
    ///
    /// The query string, fragment and any trailing slash are ignored.
    /// Returns `None` if no route matches.
    #[must_use]
    pub fn resolve(&self, location: &str) -> Option<ResolvedRoute> {
        let path = normalize(strip_query(location));
        let parts = split(&path);

        self.routes.iter().find_map(|route| {
            route.capture(&parts).map(|params| ResolvedRoute {
                path: path.clone(),
                name: route.name.clone(),
                meta: route.meta,
                params,
                redirect: route.redirect.clone(),
            })
        })
    }

    /// The garage booking application's routes.
    ///
    /// - Public pages: home, shop directory and detail, login, register,
    ///   services, announcements, about
    /// - Customer pages requiring a login: appointment, member center,
    ///   orders, reviews, order detail
    /// - `/shop/login`, public
    /// - `/shop/**`, requiring a customer login flag and a shop token
    /// - `/admin/**`, requiring a customer login flag and the admin role
    #[must_use]
    pub fn standard() -> Self {
        let named = |path: &str, name: &str| RouteNode::new(path).name(name);
        let member = |path: &str, name: &str| named(path, name).requires_auth(true);

        Self::new(vec![
            named("/", "Home"),
            named("/shops", "ShopList"),
            named("/shops/:id", "ShopDetail"),
            member("/appointment", "Appointment"),
            named("/login", "Login"),
            named("/register", "Register"),
            member("/member-center", "MemberCenter"),
            member("/my-orders", "MyOrders"),
            member("/my-reviews", "MyReviews"),
            member("/create-review", "CreateReview"),
            member("/order-detail", "OrderDetail"),
            named("/services", "Services"),
            named("/announcements", "Announcements"),
            named("/about", "About"),
            named("/shop/login", "ShopLogin"),
            RouteNode::new("/shop")
                .requires_auth(true)
                .requires_shop(true)
                .child(RouteNode::new("").redirect("/shop/dashboard"))
                .child(named("dashboard", "ShopDashboard"))
                .child(named("orders", "ShopOrderManagement"))
                .child(named("orders/:id", "ShopOrderDetail"))
                .child(named("services", "ServiceManagement"))
                .child(named("packages", "PackageManagement"))
                .child(named("profile", "ShopProfile")),
            RouteNode::new("/admin")
                .requires_auth(true)
                .requires_admin(true)
                .child(RouteNode::new("").redirect("/admin/dashboard"))
                .child(named("dashboard", "AdminDashboard"))
                .child(named("users", "UserManagement"))
                .child(named("shops", "ShopManagement"))
                .child(named("orders", "OrderManagement"))
                .child(named("reviews", "ReviewManagement"))
                .child(named("members", "MemberManagement"))
                .child(named("announcements", "AnnouncementManagement"))
                .child(named("price-monitor", "PriceMonitor"))
                .child(named("data-export", "DataExport"))
                .child(named("data-statistics", "DataStatistics"))
                .child(named("settings", "SystemSettings")),
        ])
    }
}

fn flatten(node: &RouteNode, parent: &str, inherited: RouteMeta, out: &mut Vec<Route>) {
    let full = join(parent, &node.path);
    let meta = RouteMeta {
        requires_auth: node.requires_auth.unwrap_or(inherited.requires_auth),
        requires_admin: node.requires_admin.unwrap_or(inherited.requires_admin),
        requires_shop: node.requires_shop.unwrap_or(inherited.requires_shop),
    };

    for child in &node.children {
        flatten(child, &full, meta, out);
    }

    let segments = split(&full)
        .into_iter()
        .map(|part| match part.strip_prefix(':') {
            Some(param) => Segment::Param(param.to_string()),
            None => Segment::Static(part.to_string()),
        })
        .collect();

    let redirect = match node.redirect.as_deref().map(AppPath::new) {
        None => None,
        Some(Ok(target)) => Some(target),
        Some(Err(e)) => {
            tracing::warn!(route = %full, error = %e, "skipping route with invalid redirect");
            return;
        }
    };

    out.push(Route {
        segments,
        name: node.name.clone(),
        meta,
        redirect,
    });
}

fn join(parent: &str, path: &str) -> String {
    if path.starts_with('/') || parent.is_empty() {
        return normalize(path);
    }
    if path.is_empty() {
        return normalize(parent);
    }
    normalize(&format!("{}/{path}", parent.trim_end_matches('/')))
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn split(path: &str) -> Vec<&str> {
    path.split('/').filter(|part| !part.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_public_route() {
        let route = RouteTable::standard().resolve("/about").unwrap();
        assert_eq!(route.name.as_deref(), Some("About"));
        assert_eq!(route.meta, RouteMeta::PUBLIC);
    }

    #[test]
    fn test_resolves_root() {
        let route = RouteTable::standard().resolve("/").unwrap();
        assert_eq!(route.name.as_deref(), Some("Home"));
        assert_eq!(route.path, "/");
    }

    #[test]
    fn test_children_inherit_parent_meta() {
        let route = RouteTable::standard().resolve("/shop/orders").unwrap();
        assert!(route.meta.requires_auth);
        assert!(route.meta.requires_shop);
        assert!(!route.meta.requires_admin);

        let route = RouteTable::standard().resolve("/admin/settings").unwrap();
        assert!(route.meta.requires_admin);
    }

    #[test]
    fn test_child_flag_overrides_parent() {
        let table = RouteTable::new(vec![RouteNode::new("/shop")
            .requires_shop(true)
            .child(RouteNode::new("help").name("Help").requires_shop(false))]);
        let route = table.resolve("/shop/help").unwrap();
        assert!(!route.meta.requires_shop);
    }

    #[test]
    fn test_shop_login_is_public() {
        let route = RouteTable::standard().resolve("/shop/login").unwrap();
        assert_eq!(route.name.as_deref(), Some("ShopLogin"));
        assert_eq!(route.meta, RouteMeta::PUBLIC);
    }

    #[test]
    fn test_empty_child_redirects() {
        let route = RouteTable::standard().resolve("/shop/").unwrap();
        assert_eq!(route.redirect.unwrap().as_str(), "/shop/dashboard");

        let route = RouteTable::standard().resolve("/admin").unwrap();
        assert_eq!(route.redirect.unwrap().as_str(), "/admin/dashboard");
    }

    #[test]
    fn test_route_with_invalid_redirect_is_skipped() {
        let table = RouteTable::new(vec![
            RouteNode::new("/old-home").redirect("home"),
            RouteNode::new("/about").name("About"),
        ]);
        assert_eq!(table.len(), 1);
        assert!(table.resolve("/old-home").is_none());
        assert!(table.resolve("/about").is_some());
    }

    #[test]
    fn test_param_segments_are_captured() {
        let route = RouteTable::standard().resolve("/shops/9").unwrap();
        assert_eq!(route.name.as_deref(), Some("ShopDetail"));
        assert_eq!(route.params.get("id").map(String::as_str), Some("9"));

        let route = RouteTable::standard().resolve("/shop/orders/31").unwrap();
        assert_eq!(route.name.as_deref(), Some("ShopOrderDetail"));
        assert_eq!(route.params["id"], "31");
    }

    #[test]
    fn test_query_and_fragment_are_ignored() {
        let route = RouteTable::standard().resolve("/order-detail?id=5#summary").unwrap();
        assert_eq!(route.name.as_deref(), Some("OrderDetail"));
        assert_eq!(route.path, "/order-detail");
        assert!(route.meta.requires_auth);
    }

    #[test]
    fn test_unknown_path_does_not_resolve() {
        assert!(RouteTable::standard().resolve("/nowhere").is_none());
        assert!(RouteTable::standard().resolve("/shops/1/extra").is_none());
    }

    #[test]
    fn test_empty_table() {
        let table = RouteTable::default();
        assert!(table.is_empty());
        assert!(table.resolve("/").is_none());
    }

    #[test]
    fn test_join_paths() {
        assert_eq!(join("", "/shop"), "/shop");
        assert_eq!(join("/shop", ""), "/shop");
        assert_eq!(join("/shop", "orders/:id"), "/shop/orders/:id");
        assert_eq!(join("/", "about"), "/about");
    }
}
