//! Credentials for the two authentication contexts.
//!
//! The backend serves two independent kinds of account: customers (the
//! [`CredentialScope::User`] scope, which also covers administrators) and
//! shop operators ([`CredentialScope::Shop`]). Each scope holds at most one
//! live [`Token`], and clearing one scope never touches the other.
//!
//! # Overview
//!
//! - [`CredentialStore`]: Per-scope token and profile storage over a
//!   [`StorageBackend`]
//! - [`ScopeResolver`]: Decides which scope an outgoing request uses
//! - [`SessionSnapshot`]: The session state the navigation guard reads
//! - [`session`]: Login and logout flows for both scopes
//!
//! # Example
//!
//! ```rust
//! use garage_client::auth::{CredentialScope, CredentialStore, SessionFields, Token};
//!
//! let store = CredentialStore::in_memory();
//! store
//!     .set(
//!         CredentialScope::User,
//!         Token::new("user-token").unwrap(),
//!         SessionFields::new().username("alice").role("admin"),
//!     )
//!     .unwrap();
//! store
//!     .set(CredentialScope::Shop, Token::new("shop-token").unwrap(), SessionFields::new())
//!     .unwrap();
//!
//! store.clear(CredentialScope::Shop).unwrap();
//!
//! let snapshot = store.snapshot();
//! assert!(snapshot.is_admin());
//! assert!(snapshot.shop_token.is_none());
//! ```

mod scope;
pub mod session;
mod store;
mod token;

pub use scope::{CredentialScope, RequestDescriptor, ScopeResolver};
pub use session::{
    login_shop, login_user, logout_shop, logout_user, LoginCredentials, ShopSession, UserRole,
    UserSession,
};
pub use store::{
    CredentialStore, FileStorage, MemoryStorage, SessionFields, SessionSnapshot, StorageBackend,
    StorageError, ADMIN_ROLE, SHOP_PROFILE_KEY, SHOP_TOKEN_KEY, USER_NAME_KEY, USER_PROFILE_KEY,
    USER_ROLE_KEY, USER_TOKEN_KEY,
};
pub use token::Token;
