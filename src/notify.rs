//! User-visible error channel.
//!
//! The response interceptor reports application errors, expired sessions
//! and transport failures through a [`Notifier`]. Hosts plug in whatever
//! surface they have, such as a toast or a status bar.

use std::fmt;

/// Message shown when a 401 clears a scope's credentials.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired, please log in again";

/// Fallback for envelope failures that carry no message.
pub const REQUEST_FAILED_MESSAGE: &str = "Request failed";

/// Fallback for transport failures that carry no message.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error";

/// Receives user-facing error messages.
pub trait Notifier: Send + Sync + fmt::Debug {
    /// Surfaces an error message to the user.
    fn error(&self, message: &str);
}

/// A [`Notifier`] that emits messages as `tracing` warnings.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::warn!(target: "garage_client::notice", "{message}");
    }
}
