//! Credential scopes and request scope resolution.
//!
//! Every outgoing request is resolved to exactly one [`CredentialScope`]
//! before dispatch. The resolver is a pure function over a
//! [`RequestDescriptor`]; it never looks at stored credentials.

use std::fmt;

use crate::config::RealmPaths;

/// One of the two independent authentication contexts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CredentialScope {
    /// End-customer (and administrator) credentials.
    User,
    /// Shop-operator credentials.
    Shop,
}

impl CredentialScope {
    /// Returns the lowercase scope name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Shop => "shop",
        }
    }
}

impl fmt::Display for CredentialScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The parts of an outgoing request that decide its scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// Request path relative to the API prefix (e.g. `/shop/my`).
    pub path: String,
    /// Forces the Shop scope for shop-operator calls whose path lies
    /// outside the shop prefix (e.g. `/orders/shop`).
    pub explicit_scope_override: bool,
}

impl RequestDescriptor {
    /// Creates a descriptor without the override flag.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            explicit_scope_override: false,
        }
    }

    /// Creates a descriptor with the override flag set.
    #[must_use]
    pub fn shop_scoped(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            explicit_scope_override: true,
        }
    }
}

/// Maps request descriptors to credential scopes.
///
/// Resolution order:
///
/// 1. `explicit_scope_override` set: [`CredentialScope::Shop`]
/// 2. path starts with the shop API prefix: [`CredentialScope::Shop`]
/// 3. otherwise: [`CredentialScope::User`]
///
/// # Example
///
/// ```rust
/// use garage_client::{CredentialScope, RequestDescriptor, ScopeResolver};
///
/// let resolver = ScopeResolver::new("/shop");
/// assert_eq!(resolver.resolve(&RequestDescriptor::new("/shop/my")), CredentialScope::Shop);
/// assert_eq!(resolver.resolve(&RequestDescriptor::shop_scoped("/orders/shop")), CredentialScope::Shop);
/// assert_eq!(resolver.resolve(&RequestDescriptor::new("/orders/my")), CredentialScope::User);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeResolver {
    shop_prefix: String,
}

impl ScopeResolver {
    /// Creates a resolver for the given shop API prefix.
    #[must_use]
    pub fn new(shop_prefix: impl Into<String>) -> Self {
        Self {
            shop_prefix: shop_prefix.into(),
        }
    }

    /// Creates a resolver from the configured realm layout.
    #[must_use]
    pub fn from_realm_paths(paths: &RealmPaths) -> Self {
        Self::new(paths.shop_api_prefix.clone())
    }

    /// Resolves the scope for a request.
    #[must_use]
    pub fn resolve(&self, descriptor: &RequestDescriptor) -> CredentialScope {
        if descriptor.explicit_scope_override || descriptor.path.starts_with(&self.shop_prefix) {
            CredentialScope::Shop
        } else {
            CredentialScope::User
        }
    }
}

impl Default for ScopeResolver {
    fn default() -> Self {
        Self::from_realm_paths(&RealmPaths::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shop_prefixed_paths_resolve_to_shop_regardless_of_override() {
        let resolver = ScopeResolver::default();
        for path in ["/shop/auth/login", "/shop/my", "/shop/list", "/shop/12"] {
            assert_eq!(
                resolver.resolve(&RequestDescriptor::new(path)),
                CredentialScope::Shop
            );
            assert_eq!(
                resolver.resolve(&RequestDescriptor::shop_scoped(path)),
                CredentialScope::Shop
            );
        }
    }

    #[test]
    fn test_override_forces_shop_scope() {
        let resolver = ScopeResolver::default();
        for path in ["/orders/shop", "/service-item/my", "/appointment/stats"] {
            assert_eq!(
                resolver.resolve(&RequestDescriptor::shop_scoped(path)),
                CredentialScope::Shop
            );
        }
    }

    #[test]
    fn test_other_paths_resolve_to_user() {
        let resolver = ScopeResolver::default();
        for path in ["/auth/login", "/orders/my", "/admin/users", "/user/profile", "/"] {
            assert_eq!(
                resolver.resolve(&RequestDescriptor::new(path)),
                CredentialScope::User
            );
        }
    }

    #[test]
    fn test_custom_prefix() {
        let resolver = ScopeResolver::new("/merchant");
        assert_eq!(
            resolver.resolve(&RequestDescriptor::new("/merchant/orders")),
            CredentialScope::Shop
        );
        assert_eq!(
            resolver.resolve(&RequestDescriptor::new("/shop/orders")),
            CredentialScope::User
        );
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(CredentialScope::User.to_string(), "user");
        assert_eq!(CredentialScope::Shop.to_string(), "shop");
    }
}
