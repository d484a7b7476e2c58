//! Validated newtype wrappers for configuration values.
//!
//! Invalid values are rejected on construction with a [`ConfigError`].

use crate::error::ConfigError;
use std::fmt;

/// A validated backend base URL.
///
/// Only `http` and `https` schemes are accepted. A trailing slash is
/// stripped so paths can be appended directly.
///
/// # Example
///
/// ```rust
/// use garage_client::BaseUrl;
///
/// let url = BaseUrl::new("https://garage.example.com/").unwrap();
/// assert_eq!(url.as_ref(), "https://garage.example.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL has no supported
    /// scheme or no host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();

        let scheme_end = url
            .find("://")
            .ok_or_else(|| ConfigError::InvalidBaseUrl { url: url.clone() })?;

        let scheme = &url[..scheme_end];
        if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
            return Err(ConfigError::InvalidBaseUrl { url: url.clone() });
        }

        let host_start = scheme_end + 3;
        let host_len = url[host_start..]
            .find([':', '/', '?', '#'])
            .unwrap_or(url.len() - host_start);

        if host_len == 0 {
            return Err(ConfigError::InvalidBaseUrl { url });
        }

        Ok(Self(url))
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated absolute application path such as `/shop/login`.
///
/// Used for both navigation targets and API path prefixes. A trailing
/// slash is stripped except for the root path `/`.
///
/// # Example
///
/// ```rust
/// use garage_client::AppPath;
///
/// let path = AppPath::new("/shop/").unwrap();
/// assert_eq!(path.as_str(), "/shop");
/// assert!(path.contains("/shop/orders"));
/// assert!(!path.contains("/shops"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AppPath(String);

impl AppPath {
    /// Creates a new validated path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPath`] if the path is not absolute.
    pub fn new(path: impl Into<String>) -> Result<Self, ConfigError> {
        let path = path.into();
        let path = path.trim();
        if !path.starts_with('/') {
            return Err(ConfigError::InvalidPath {
                path: path.to_string(),
            });
        }

        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            Ok(Self("/".to_string()))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Wraps a path literal known to be absolute and normalized.
    pub(crate) fn trusted(path: &str) -> Self {
        debug_assert!(path.starts_with('/'));
        Self(path.to_string())
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `path` is this path or lies underneath it.
    ///
    /// Matching is segment-aware: `/shop` contains `/shop/orders` but not
    /// `/shops`.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        if self.0 == "/" {
            return path.starts_with('/');
        }
        path.strip_prefix(self.0.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }

    /// Returns `true` if `path` is exactly this path.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.0 == path
    }
}

impl AsRef<str> for AppPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let url = BaseUrl::new("http://localhost:8080/").unwrap();
        assert_eq!(url.as_ref(), "http://localhost:8080");
    }

    #[test]
    fn test_base_url_rejects_invalid() {
        assert!(BaseUrl::new("garage.example.com").is_err());
        assert!(BaseUrl::new("https://").is_err());
        assert!(BaseUrl::new("ftp://garage.example.com").is_err());
    }

    #[test]
    fn test_app_path_requires_leading_slash() {
        assert!(matches!(
            AppPath::new("shop/login"),
            Err(ConfigError::InvalidPath { path }) if path == "shop/login"
        ));
    }

    #[test]
    fn test_app_path_root_is_preserved() {
        let root = AppPath::new("/").unwrap();
        assert_eq!(root.as_str(), "/");
        assert!(root.contains("/anything"));
    }

    #[test]
    fn test_app_path_contains_is_segment_aware() {
        let shop = AppPath::new("/shop").unwrap();
        assert!(shop.contains("/shop"));
        assert!(shop.contains("/shop/dashboard"));
        assert!(!shop.contains("/shops"));
        assert!(!shop.contains("/shops/12"));
        assert!(!shop.contains("/workshop"));
    }
}
