//! Persistent per-scope credential storage.
//!
//! [`CredentialStore`] is the single seam through which session state is
//! read and written. It sits on top of a flat string key-value
//! [`StorageBackend`] and owns the mapping from scopes to keys:
//!
//! | Scope | Keys |
//! |-------|------|
//! | User  | `token`, `username`, `userRole`, `userInfo` |
//! | Shop  | `shopToken`, `shopInfo` |
//!
//! Clearing one scope removes only that scope's keys.
//!
//! # Example
//!
//! ```rust
//! use garage_client::{CredentialScope, CredentialStore, SessionFields, Token};
//!
//! let store = CredentialStore::in_memory();
//! store
//!     .set(
//!         CredentialScope::User,
//!         Token::new("user-token").unwrap(),
//!         SessionFields::new().username("alice").role("admin"),
//!     )
//!     .unwrap();
//!
//! let snapshot = store.snapshot();
//! assert!(snapshot.is_admin());
//! assert!(snapshot.shop_token.is_none());
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use crate::auth::scope::CredentialScope;
use crate::auth::token::Token;

/// Key holding the customer token.
pub const USER_TOKEN_KEY: &str = "token";
/// Key holding the customer username.
pub const USER_NAME_KEY: &str = "username";
/// Key holding the customer role.
pub const USER_ROLE_KEY: &str = "userRole";
/// Key holding the customer profile JSON.
pub const USER_PROFILE_KEY: &str = "userInfo";
/// Key holding the shop-operator token.
pub const SHOP_TOKEN_KEY: &str = "shopToken";
/// Key holding the shop profile JSON.
pub const SHOP_PROFILE_KEY: &str = "shopInfo";

/// Role value that grants access to the admin realm.
pub const ADMIN_ROLE: &str = "admin";

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("Storage I/O error at '{path}': {source}")]
    Io {
        /// The backing file path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The backing file or a stored value is not valid JSON.
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A flat string key-value store with browser-storage semantics.
///
/// Reads never fail; writes may fail for persistent backends.
pub trait StorageBackend: Send + Sync + fmt::Debug {
    /// Returns the value stored under `key`.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the write cannot be persisted.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the removal cannot be persisted.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local storage that is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.remove(key);
        Ok(())
    }
}

/// Storage persisted as a single JSON object file.
///
/// The file is read once on [`FileStorage::open`] and rewritten after every
/// mutation. Several processes sharing one file are not coordinated: the
/// last writer wins.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Opens the store at `path`, starting empty if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the file exists but cannot be read, or
    /// [`StorageError::Serialization`] if it is not a JSON string map.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let items = match std::fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let contents = serde_json::to_string_pretty(items)?;
        std::fs::write(&self.path, contents).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), value.to_string());
        self.persist(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        if items.remove(key).is_some() {
            self.persist(&items)?;
        }
        Ok(())
    }
}

/// Ancillary fields written alongside a token.
///
/// `username` and `role` only exist for the User scope and are ignored
/// when writing the Shop scope.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionFields {
    /// Customer username.
    pub username: Option<String>,
    /// Customer role (`admin` unlocks the admin realm).
    pub role: Option<String>,
    /// Profile document returned by the backend.
    pub profile: Option<serde_json::Value>,
}

impl SessionFields {
    /// Creates an empty set of fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the username.
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the role.
    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Sets the profile document.
    #[must_use]
    pub fn profile(mut self, profile: serde_json::Value) -> Self {
        self.profile = Some(profile);
        self
    }
}

/// Session state read at decision time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Customer token, if logged in.
    pub user_token: Option<Token>,
    /// Shop-operator token, if logged in.
    pub shop_token: Option<Token>,
    /// Customer role; always `None` when `user_token` is `None`.
    pub user_role: Option<String>,
}

impl SessionSnapshot {
    /// Returns `true` if a customer token is present and its role is `admin`.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user_token.is_some() && self.user_role.as_deref() == Some(ADMIN_ROLE)
    }

    /// Returns `true` if the given scope holds a token.
    #[must_use]
    pub const fn has_token(&self, scope: CredentialScope) -> bool {
        match scope {
            CredentialScope::User => self.user_token.is_some(),
            CredentialScope::Shop => self.shop_token.is_some(),
        }
    }
}

struct ScopeKeys {
    token: &'static str,
    username: Option<&'static str>,
    role: Option<&'static str>,
    profile: &'static str,
}

impl ScopeKeys {
    const fn for_scope(scope: CredentialScope) -> Self {
        match scope {
            CredentialScope::User => Self {
                token: USER_TOKEN_KEY,
                username: Some(USER_NAME_KEY),
                role: Some(USER_ROLE_KEY),
                profile: USER_PROFILE_KEY,
            },
            CredentialScope::Shop => Self {
                token: SHOP_TOKEN_KEY,
                username: None,
                role: None,
                profile: SHOP_PROFILE_KEY,
            },
        }
    }

    fn all(&self) -> impl Iterator<Item = &'static str> {
        [Some(self.token), self.username, self.role, Some(self.profile)]
            .into_iter()
            .flatten()
    }
}

/// Per-scope credential storage over a [`StorageBackend`].
///
/// # Thread Safety
///
/// `CredentialStore` is `Send + Sync` and is normally shared behind an
/// `Arc` by the API client and the router.
#[derive(Debug)]
pub struct CredentialStore {
    backend: Box<dyn StorageBackend>,
}

// Verify CredentialStore is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CredentialStore>();
};

impl CredentialStore {
    /// Creates a store over the given backend.
    #[must_use]
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Creates a store over a fresh [`MemoryStorage`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Returns the token stored for `scope`.
    ///
    /// Blank stored values are treated as absent.
    #[must_use]
    pub fn get(&self, scope: CredentialScope) -> Option<Token> {
        let keys = ScopeKeys::for_scope(scope);
        self.backend
            .get_item(keys.token)
            .and_then(|value| Token::new(value).ok())
    }

    /// Starts a new session for `scope`, replacing everything previously
    /// stored for it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot persist the write.
    pub fn set(
        &self,
        scope: CredentialScope,
        token: Token,
        fields: SessionFields,
    ) -> Result<(), StorageError> {
        self.clear(scope)?;
        let keys = ScopeKeys::for_scope(scope);
        self.backend.set_item(keys.token, token.as_str())?;
        self.update_fields(scope, fields)?;
        tracing::debug!(scope = %scope, "stored credentials");
        Ok(())
    }

    /// Writes the provided ancillary fields for `scope`, leaving the token
    /// and any unset fields untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if a value cannot be serialized or persisted.
    pub fn update_fields(
        &self,
        scope: CredentialScope,
        fields: SessionFields,
    ) -> Result<(), StorageError> {
        let keys = ScopeKeys::for_scope(scope);

        match (keys.username, fields.username) {
            (Some(key), Some(username)) => self.backend.set_item(key, &username)?,
            (None, Some(_)) => tracing::debug!(scope = %scope, "ignoring username for scope"),
            _ => {}
        }
        match (keys.role, fields.role) {
            (Some(key), Some(role)) => self.backend.set_item(key, &role)?,
            (None, Some(_)) => tracing::debug!(scope = %scope, "ignoring role for scope"),
            _ => {}
        }
        if let Some(profile) = fields.profile {
            let serialized = serde_json::to_string(&profile)?;
            self.backend.set_item(keys.profile, &serialized)?;
        }
        Ok(())
    }

    /// Removes every key belonging to `scope` and nothing else.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if a removal cannot be persisted.
    pub fn clear(&self, scope: CredentialScope) -> Result<(), StorageError> {
        for key in ScopeKeys::for_scope(scope).all() {
            self.backend.remove_item(key)?;
        }
        Ok(())
    }

    /// Returns the stored customer username.
    #[must_use]
    pub fn username(&self) -> Option<String> {
        self.backend.get_item(USER_NAME_KEY)
    }

    /// Returns the stored profile document for `scope`.
    ///
    /// Values that are not valid JSON are treated as absent.
    #[must_use]
    pub fn profile(&self, scope: CredentialScope) -> Option<serde_json::Value> {
        let keys = ScopeKeys::for_scope(scope);
        self.backend
            .get_item(keys.profile)
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }

    /// Reads the current session state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let user_token = self.get(CredentialScope::User);
        let user_role = user_token
            .as_ref()
            .and_then(|_| self.backend.get_item(USER_ROLE_KEY));

        SessionSnapshot {
            user_token,
            shop_token: self.get(CredentialScope::Shop),
            user_role,
        }
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
