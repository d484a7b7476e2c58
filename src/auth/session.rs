//! Login and logout flows for both credential scopes.
//!
//! A token is created by a successful login for its scope and destroyed by
//! an explicit logout (or by a `401` handled in the response interceptor).
//! There is no client-side expiry.
//!
//! # Example
//!
//! ```rust,ignore
//! use garage_client::auth::session::{login_user, logout_user, LoginCredentials};
//!
//! let session = login_user(&client, &LoginCredentials::new("alice", "secret")).await?;
//! if session.role == UserRole::Admin {
//!     router.navigate("/admin/dashboard")?;
//! }
//!
//! logout_user(&client).await?;
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::auth::{CredentialScope, SessionFields, Token};
use crate::clients::{ApiClient, ApiError, ApiRequest, HttpMethod};

/// Customer login endpoint.
pub const USER_LOGIN_PATH: &str = "/auth/login";
/// Customer logout endpoint.
pub const USER_LOGOUT_PATH: &str = "/auth/logout";
/// Customer profile endpoint.
pub const USER_PROFILE_PATH: &str = "/user/profile";
/// Shop-operator login endpoint.
pub const SHOP_LOGIN_PATH: &str = "/shop/auth/login";
/// Shop-operator logout endpoint.
pub const SHOP_LOGOUT_PATH: &str = "/shop/auth/logout";

/// Username and password submitted to a login endpoint.
#[derive(Clone, Serialize)]
pub struct LoginCredentials {
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl LoginCredentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"*****")
            .finish()
    }
}

/// Account role derived from the backend's numeric `userType`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserRole {
    /// Vehicle owner (`userType` 1, and any unknown value).
    Customer,
    /// Shop account (`userType` 2).
    Shop,
    /// Platform administrator (`userType` 3).
    Admin,
}

impl UserRole {
    /// Maps the backend `userType` code to a role.
    #[must_use]
    pub const fn from_user_type(user_type: Option<i64>) -> Self {
        match user_type {
            Some(2) => Self::Shop,
            Some(3) => Self::Admin,
            _ => Self::Customer,
        }
    }

    /// Returns the value persisted under the role key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "user",
            Self::Shop => "shop",
            Self::Admin => crate::auth::store::ADMIN_ROLE,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logged-in customer session.
#[derive(Clone, Debug, PartialEq)]
pub struct UserSession {
    /// The stored token.
    pub token: Token,
    /// The account name.
    pub username: String,
    /// The account role.
    pub role: UserRole,
    /// The profile document returned by the backend.
    pub profile: serde_json::Value,
}

/// A logged-in shop-operator session.
#[derive(Clone, Debug, PartialEq)]
pub struct ShopSession {
    /// The stored token.
    pub token: Token,
    /// The shop document returned with the token.
    pub shop: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    token: String,
    #[serde(default)]
    shop: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileData {
    #[serde(default)]
    user_type: Option<i64>,
}

fn token_from(data: &LoginData) -> Result<Token, ApiError> {
    Token::new(data.token.clone()).map_err(|_| ApiError::Application {
        code: None,
        message: "Login response did not contain a token".to_string(),
    })
}

/// Logs a customer in and stores the User-scope session.
///
/// The token is stored before the profile is fetched, so the profile call
/// is authenticated. If the profile call fails the token stays stored and
/// the error is returned.
///
/// # Errors
///
/// Returns [`ApiError`] if either call fails or the session cannot be stored.
pub async fn login_user(
    client: &ApiClient,
    credentials: &LoginCredentials,
) -> Result<UserSession, ApiError> {
    let request = ApiRequest::builder(HttpMethod::Post, USER_LOGIN_PATH)
        .body(serde_json::to_value(credentials)?)
        .build()?;
    let data: LoginData = client.request_json(request).await?;
    let token = token_from(&data)?;

    let store = client.store();
    store.set(
        CredentialScope::User,
        token.clone(),
        SessionFields::new().username(credentials.username.clone()),
    )?;

    let profile = client.get(USER_PROFILE_PATH).await?;
    let user_type = serde_json::from_value::<ProfileData>(profile.clone())
        .ok()
        .and_then(|p| p.user_type);
    let role = UserRole::from_user_type(user_type);

    store.update_fields(
        CredentialScope::User,
        SessionFields::new()
            .role(role.as_str())
            .profile(profile.clone()),
    )?;

    tracing::info!(username = %credentials.username, role = %role, "user logged in");

    Ok(UserSession {
        token,
        username: credentials.username.clone(),
        role,
        profile,
    })
}

/// Logs the customer out and clears the User scope.
///
/// The server call is best effort; the local session is cleared even if it
/// fails.
///
/// # Errors
///
/// Returns [`ApiError::Storage`] if the scope cannot be cleared.
pub async fn logout_user(client: &ApiClient) -> Result<(), ApiError> {
    let request = ApiRequest::builder(HttpMethod::Post, USER_LOGOUT_PATH)
        .body(serde_json::json!({}))
        .build()?;
    if let Err(e) = client.request(request).await {
        tracing::debug!(error = %e, "logout call failed");
    }

    client.store().clear(CredentialScope::User)?;
    tracing::info!("user logged out");
    Ok(())
}

/// Logs a shop operator in and stores the Shop-scope session.
///
/// # Errors
///
/// Returns [`ApiError`] if the call fails or the session cannot be stored.
pub async fn login_shop(
    client: &ApiClient,
    credentials: &LoginCredentials,
) -> Result<ShopSession, ApiError> {
    let request = ApiRequest::builder(HttpMethod::Post, SHOP_LOGIN_PATH)
        .body(serde_json::to_value(credentials)?)
        .build()?;
    let data: LoginData = client.request_json(request).await?;
    let token = token_from(&data)?;

    client.store().set(
        CredentialScope::Shop,
        token.clone(),
        SessionFields::new().profile(data.shop.clone()),
    )?;

    tracing::info!(username = %credentials.username, "shop logged in");

    Ok(ShopSession {
        token,
        shop: data.shop,
    })
}

/// Logs the shop operator out and clears the Shop scope.
///
/// # Errors
///
/// Returns [`ApiError::Storage`] if the scope cannot be cleared.
pub async fn logout_shop(client: &ApiClient) -> Result<(), ApiError> {
    let request = ApiRequest::builder(HttpMethod::Post, SHOP_LOGOUT_PATH)
        .body(serde_json::json!({}))
        .shop_scoped()
        .build()?;
    if let Err(e) = client.request(request).await {
        tracing::debug!(error = %e, "shop logout call failed");
    }

    client.store().clear(CredentialScope::Shop)?;
    tracing::info!("shop logged out");
    Ok(())
}
