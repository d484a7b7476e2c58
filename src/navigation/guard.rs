//! The navigation guard decision table.
//!
//! [`NavigationGuard::decide`] is a pure function of the target path, its
//! resolved [`RouteMeta`] and a [`SessionSnapshot`]. The rules are checked
//! in order and the first one that matches decides:
//!
//! | # | Target | Session | Decision |
//! |---|--------|---------|----------|
//! | 1 | shop realm, not shop login, `requires_shop` | no shop token | shop login |
//! | 2 | shop login | shop token | shop dashboard |
//! | 3 | any other shop-realm path | any | allow |
//! | 4 | admin realm | no user token / not admin / admin | user login / home / allow |
//! | 5 | not shop-prefixed, not exempt | shop token | shop dashboard |
//! | 6 | `requires_auth` | no user token | user login |
//! | 7 | anything else | any | allow |
//!
//! Rules 1-3 must run before rule 5, and rule 5 exempts the customer login,
//! registration and public shop directory so a shop session can still leave
//! its realm through them.

use crate::auth::SessionSnapshot;
use crate::config::{AppPath, RealmPaths};

/// Access requirements of a route, after inheritance from its parents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteMeta {
    /// A customer token is required.
    pub requires_auth: bool,
    /// The customer must have the administrator role.
    pub requires_admin: bool,
    /// A shop-operator token is required.
    pub requires_shop: bool,
}

impl RouteMeta {
    /// Metadata for a public route.
    pub const PUBLIC: Self = Self {
        requires_auth: false,
        requires_admin: false,
        requires_shop: false,
    };

    /// Metadata for a route that requires a customer token.
    pub const AUTHENTICATED: Self = Self {
        requires_auth: true,
        requires_admin: false,
        requires_shop: false,
    };
}

/// The outcome of one guard evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// The navigation may commit.
    Allow,
    /// The navigation must go to this path instead.
    Redirect(AppPath),
}

impl GuardDecision {
    /// Returns the redirect target, if any.
    #[must_use]
    pub const fn redirect_target(&self) -> Option<&AppPath> {
        match self {
            Self::Allow => None,
            Self::Redirect(path) => Some(path),
        }
    }
}

/// Decides whether a navigation proceeds or is redirected.
///
/// # Example
///
/// ```rust
/// use garage_client::auth::SessionSnapshot;
/// use garage_client::navigation::{GuardDecision, NavigationGuard, RouteMeta};
/// use garage_client::Token;
///
/// let guard = NavigationGuard::default();
/// let session = SessionSnapshot {
///     shop_token: Some(Token::new("shop-token").unwrap()),
///     ..SessionSnapshot::default()
/// };
///
/// let decision = guard.decide("/my-orders", &RouteMeta::AUTHENTICATED, &session);
/// assert_eq!(decision.redirect_target().unwrap().as_str(), "/shop/dashboard");
/// ```
#[derive(Clone, Debug, Default)]
pub struct NavigationGuard {
    paths: RealmPaths,
}

impl NavigationGuard {
    /// Creates a guard over the given realm layout.
    #[must_use]
    pub const fn new(paths: RealmPaths) -> Self {
        Self { paths }
    }

    /// Returns the realm layout the guard decides against.
    #[must_use]
    pub const fn realm_paths(&self) -> &RealmPaths {
        &self.paths
    }

    /// Evaluates the rules for one navigation attempt.
    ///
    /// `target` is the path without query string or fragment.
    #[must_use]
    pub fn decide(
        &self,
        target: &str,
        meta: &RouteMeta,
        session: &SessionSnapshot,
    ) -> GuardDecision {
        let decision = self.evaluate(target, meta, session);
        tracing::debug!(
            target_path = target,
            decision = ?decision,
            has_user_token = session.user_token.is_some(),
            has_shop_token = session.shop_token.is_some(),
            "navigation guard evaluated"
        );
        decision
    }

    fn evaluate(&self, target: &str, meta: &RouteMeta, session: &SessionSnapshot) -> GuardDecision {
        let paths = &self.paths;
        let redirect = |path: &AppPath| GuardDecision::Redirect(path.clone());

        if paths.in_shop_realm(target) {
            let is_login = paths.shop_login.matches(target);
            if !is_login && meta.requires_shop && session.shop_token.is_none() {
                return redirect(&paths.shop_login);
            }
            if is_login && session.shop_token.is_some() {
                return redirect(&paths.shop_dashboard);
            }
            return GuardDecision::Allow;
        }

        if paths.in_admin_realm(target) {
            if session.user_token.is_none() {
                return redirect(&paths.user_login);
            }
            if !session.is_admin() {
                return redirect(&paths.home);
            }
            return GuardDecision::Allow;
        }

        if session.shop_token.is_some()
            && !target.starts_with(paths.shop_realm.as_str())
            && !paths.is_containment_exempt(target)
        {
            return redirect(&paths.shop_dashboard);
        }

        if meta.requires_auth && session.user_token.is_none() {
            return redirect(&paths.user_login);
        }

        GuardDecision::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Token;

    fn guard() -> NavigationGuard {
        NavigationGuard::default()
    }

    fn session(user: bool, role: Option<&str>, shop: bool) -> SessionSnapshot {
        SessionSnapshot {
            user_token: user.then(|| Token::new("user-token").unwrap()),
            shop_token: shop.then(|| Token::new("shop-token").unwrap()),
            user_role: role.map(String::from),
        }
    }

    fn shop_meta() -> RouteMeta {
        RouteMeta {
            requires_auth: true,
            requires_admin: false,
            requires_shop: true,
        }
    }

    fn admin_meta() -> RouteMeta {
        RouteMeta {
            requires_auth: true,
            requires_admin: true,
            requires_shop: false,
        }
    }

    fn redirect(path: &str) -> GuardDecision {
        GuardDecision::Redirect(AppPath::new(path).unwrap())
    }

    #[test]
    fn test_shop_page_without_shop_token_goes_to_shop_login() {
        let decision = guard().decide("/shop/orders", &shop_meta(), &session(false, None, false));
        assert_eq!(decision, redirect("/shop/login"));
    }

    #[test]
    fn test_shop_page_ignores_user_token() {
        let decision = guard().decide(
            "/shop/orders",
            &shop_meta(),
            &session(true, Some("user"), false),
        );
        assert_eq!(decision, redirect("/shop/login"));
    }

    #[test]
    fn test_shop_login_with_shop_token_goes_to_dashboard() {
        let decision = guard().decide(
            "/shop/login",
            &RouteMeta::PUBLIC,
            &session(false, None, true),
        );
        assert_eq!(decision, redirect("/shop/dashboard"));
    }

    #[test]
    fn test_shop_login_without_shop_token_is_allowed() {
        let decision = guard().decide(
            "/shop/login",
            &RouteMeta::PUBLIC,
            &session(false, None, false),
        );
        assert_eq!(decision, GuardDecision::Allow);
    }

    #[test]
    fn test_shop_page_with_shop_token_is_allowed() {
        let decision = guard().decide("/shop/orders/42", &shop_meta(), &session(false, None, true));
        assert_eq!(decision, GuardDecision::Allow);
    }

    #[test]
    fn test_shop_realm_without_requires_shop_is_allowed() {
        let decision = guard().decide(
            "/shop/help",
            &RouteMeta::PUBLIC,
            &session(false, None, false),
        );
        assert_eq!(decision, GuardDecision::Allow);
    }

    #[test]
    fn test_admin_without_user_token_goes_to_login() {
        let decision = guard().decide(
            "/admin/dashboard",
            &admin_meta(),
            &session(false, None, false),
        );
        assert_eq!(decision, redirect("/login"));
    }

    #[test]
    fn test_admin_with_non_admin_role_goes_home() {
        let decision = guard().decide(
            "/admin/dashboard",
            &admin_meta(),
            &session(true, Some("user"), false),
        );
        assert_eq!(decision, redirect("/"));
    }

    #[test]
    fn test_admin_with_admin_role_is_allowed() {
        let decision = guard().decide(
            "/admin/users",
            &admin_meta(),
            &session(true, Some("admin"), false),
        );
        assert_eq!(decision, GuardDecision::Allow);
    }

    #[test]
    fn test_admin_realm_checks_role_even_without_admin_meta() {
        let decision = guard().decide("/admin", &RouteMeta::PUBLIC, &session(true, None, false));
        assert_eq!(decision, redirect("/"));
    }

    #[test]
    fn test_admin_realm_is_decided_before_containment() {
        let decision = guard().decide(
            "/admin/dashboard",
            &admin_meta(),
            &session(false, None, true),
        );
        assert_eq!(decision, redirect("/login"));
    }

    #[test]
    fn test_shop_session_is_contained_before_auth_check() {
        let decision = guard().decide(
            "/my-orders",
            &RouteMeta::AUTHENTICATED,
            &session(false, None, true),
        );
        assert_eq!(decision, redirect("/shop/dashboard"));
    }

    #[test]
    fn test_shop_session_contained_on_public_page() {
        let decision = guard().decide(
            "/about",
            &RouteMeta::PUBLIC,
            &session(true, Some("user"), true),
        );
        assert_eq!(decision, redirect("/shop/dashboard"));
    }

    #[test]
    fn test_containment_exemptions() {
        let with_shop = session(false, None, true);
        for path in ["/login", "/register", "/shops", "/shops/17"] {
            let decision = guard().decide(path, &RouteMeta::PUBLIC, &with_shop);
            assert_eq!(decision, GuardDecision::Allow, "{path} should be exempt");
        }
    }

    #[test]
    fn test_containment_ignores_request_scope_prefix() {
        let guard = NavigationGuard::new(RealmPaths {
            shop_api_prefix: "/merchant".to_string(),
            ..RealmPaths::default()
        });
        let with_shop = session(false, None, true);

        let decision = guard.decide("/shop/orders", &shop_meta(), &with_shop);
        assert_eq!(decision, GuardDecision::Allow);

        let decision = guard.decide("/merchant/orders", &RouteMeta::PUBLIC, &with_shop);
        assert_eq!(decision, redirect("/shop/dashboard"));
    }

    #[test]
    fn test_requires_auth_without_user_token_goes_to_login() {
        let decision = guard().decide(
            "/member-center",
            &RouteMeta::AUTHENTICATED,
            &session(false, None, false),
        );
        assert_eq!(decision, redirect("/login"));
    }

    #[test]
    fn test_requires_auth_with_user_token_is_allowed() {
        let decision = guard().decide(
            "/member-center",
            &RouteMeta::AUTHENTICATED,
            &session(true, Some("user"), false),
        );
        assert_eq!(decision, GuardDecision::Allow);
    }

    #[test]
    fn test_public_page_is_allowed() {
        let decision = guard().decide("/", &RouteMeta::PUBLIC, &session(false, None, false));
        assert_eq!(decision, GuardDecision::Allow);
    }

    #[test]
    fn test_redirect_chains_terminate() {
        let sessions = [
            session(false, None, false),
            session(true, Some("user"), false),
            session(true, Some("admin"), false),
            session(false, None, true),
            session(true, Some("user"), true),
        ];
        let targets = [
            ("/shop/orders", shop_meta()),
            ("/shop/login", RouteMeta::PUBLIC),
            ("/admin/dashboard", admin_meta()),
            ("/my-orders", RouteMeta::AUTHENTICATED),
            ("/about", RouteMeta::PUBLIC),
        ];
        let meta_for = |path: &str| match path {
            "/shop/dashboard" => shop_meta(),
            _ => RouteMeta::PUBLIC,
        };

        for snapshot in &sessions {
            for (target, meta) in &targets {
                let mut decision = guard().decide(target, meta, snapshot);
                let mut hops = 0;
                while let GuardDecision::Redirect(next) = decision {
                    hops += 1;
                    assert!(hops <= 2, "{target} did not settle for {snapshot:?}");
                    decision = guard().decide(next.as_str(), &meta_for(next.as_str()), snapshot);
                }
            }
        }
    }
}
